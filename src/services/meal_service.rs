use crate::completion::CalorieEstimator;
use crate::db::MealRepository;
use crate::error::AppError;
use crate::models::{Food, Meal, MealPatch, MealStats, MealTotals, NewMeal};

#[derive(Clone)]
pub struct MealService {
    repo: MealRepository,
    estimator: CalorieEstimator,
}

impl MealService {
    pub fn new(repo: MealRepository, estimator: CalorieEstimator) -> Self {
        Self { repo, estimator }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Meal>, AppError> {
        Ok(self.repo.find_by_user(user_id).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Meal, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Meal"))
    }

    pub async fn create(&self, meal: NewMeal) -> Result<Meal, AppError> {
        let created = self.repo.create(&meal).await?;
        tracing::info!("Created meal {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: MealPatch) -> Result<Meal, AppError> {
        self.repo
            .update(id, &patch)
            .await?
            .ok_or(AppError::NotFound("Meal"))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.repo.delete(id).await? {
            tracing::info!("Deleted meal {}", id);
            Ok(())
        } else {
            Err(AppError::NotFound("Meal"))
        }
    }

    /// Sums a meal's calories and attaches a best-effort intake estimate,
    /// which falls back to the summed total.
    pub async fn compute_stats(&self, id: &str) -> Result<MealStats, AppError> {
        let meal = self.get(id).await?;
        let totals = MealTotals::from_foods(&meal.foods);

        let estimate = match describe_foods(&meal.foods) {
            Some(description) => self
                .estimator
                .estimate(&calories_consumed_prompt(&description))
                .await
                .map(|n| n as f64),
            None => None,
        };

        Ok(MealStats::new(meal.id, totals, estimate.unwrap_or(totals.total_calories)))
    }
}

fn describe_foods(foods: &[Food]) -> Option<String> {
    if foods.is_empty() {
        return None;
    }

    Some(foods.iter().map(describe_food).collect())
}

fn describe_food(f: &Food) -> String {
    format!("- {} x {} ({} kcal listed)\n", f.quantity, f.name, f.calories)
}

fn calories_consumed_prompt(description: &str) -> String {
    format!(
        "Estimate the total calories in this meal:\n{}Reply with a single whole number.",
        description
    )
}
