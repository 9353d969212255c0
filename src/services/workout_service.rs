use crate::completion::CalorieEstimator;
use crate::db::WorkoutRepository;
use crate::error::AppError;
use crate::models::{Exercise, NewWorkout, Workout, WorkoutPatch, WorkoutStats, WorkoutTotals};

/// Estimate reported when the completion service gives nothing usable.
const FALLBACK_CALORIES_BURNED: f64 = 0.0;

#[derive(Clone)]
pub struct WorkoutService {
    repo: WorkoutRepository,
    estimator: CalorieEstimator,
}

impl WorkoutService {
    pub fn new(repo: WorkoutRepository, estimator: CalorieEstimator) -> Self {
        Self { repo, estimator }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Workout>, AppError> {
        Ok(self.repo.find_by_user(user_id).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Workout, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Workout"))
    }

    pub async fn create(&self, workout: NewWorkout) -> Result<Workout, AppError> {
        let created = self.repo.create(&workout).await?;
        tracing::info!("Created workout {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: WorkoutPatch) -> Result<Workout, AppError> {
        self.repo
            .update(id, &patch)
            .await?
            .ok_or(AppError::NotFound("Workout"))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.repo.delete(id).await? {
            tracing::info!("Deleted workout {}", id);
            Ok(())
        } else {
            Err(AppError::NotFound("Workout"))
        }
    }

    /// Aggregates a workout and attaches a best-effort calories-burned estimate.
    ///
    /// Only a missing workout or a store failure makes this fail; the
    /// estimate falls back to zero.
    pub async fn compute_stats(&self, id: &str) -> Result<WorkoutStats, AppError> {
        let workout = self.get(id).await?;
        let totals = WorkoutTotals::from_exercises(&workout.exercises);

        let estimate = match describe_exercises(&workout.exercises) {
            Some(description) => self
                .estimator
                .estimate(&calories_burned_prompt(&description))
                .await
                .map(|n| n as f64),
            None => None,
        };

        Ok(WorkoutStats::new(
            workout.id,
            totals,
            estimate.unwrap_or(FALLBACK_CALORIES_BURNED),
        ))
    }
}

/// One line per exercise, or `None` when there is nothing to describe.
fn describe_exercises(exercises: &[Exercise]) -> Option<String> {
    if exercises.is_empty() {
        return None;
    }

    Some(exercises.iter().map(describe_exercise).collect())
}

fn describe_exercise(e: &Exercise) -> String {
    let mut line = format!("- {}: {} sets of {} reps", e.name, e.sets, e.reps);
    if e.weight > 0.0 {
        line.push_str(&format!(" at {} kg", e.weight));
    }
    line.push('\n');
    line
}

fn calories_burned_prompt(description: &str) -> String {
    format!(
        "Estimate the total calories burned by an average adult performing this workout:\n{}\
         Reply with a single whole number.",
        description
    )
}
