//! Wire schema for every request and response body.
//!
//! Incoming bodies deserialize into the `*Body` types below and are converted
//! to domain input through [`FromBody`]. Outgoing views are checked through
//! [`Validate`]. Both sides use the same [`rules`].

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{
    AuthResponse, Credentials, Exercise, Food, Meal, MealPatch, MealStats, NewMeal, NewWorkout,
    Registration, UserView, Workout, WorkoutPatch, WorkoutStats,
};
use crate::validation::{field, index, rules, FromBody, Validate, Violations};

/// Upper bound on an exercise's `sets` and `reps`.
pub const MAX_SETS_OR_REPS: i64 = 10_000;
/// Upper bound on an exercise's `weight`, in kg.
pub const MAX_WEIGHT: f64 = 10_000.0;
/// Upper bound on a food's `quantity`.
pub const MAX_QUANTITY: f64 = 10_000.0;
/// Upper bound on a food's `calories`.
pub const MAX_CALORIES: f64 = 100_000.0;

fn count(v: &mut Violations, path: &str, value: i64) -> bool {
    rules::non_negative_int(v, path, value) && rules::at_most_int(v, path, value, MAX_SETS_OR_REPS)
}

fn bounded(v: &mut Violations, path: &str, value: f64, max: f64) -> bool {
    rules::non_negative(v, path, value) && rules::at_most(v, path, value, max)
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

impl FromBody for Credentials {
    type Body = LoginBody;

    fn from_body(body: LoginBody, path: &str, v: &mut Violations) -> Option<Self> {
        let email = rules::required_text(v, path, "email", body.email);
        let password = rules::required_text(v, path, "password", body.password);

        Some(Credentials {
            email: email?,
            password: password?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupBody {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

impl FromBody for Registration {
    type Body = SignupBody;

    fn from_body(body: SignupBody, path: &str, v: &mut Violations) -> Option<Self> {
        let username = rules::required_text(v, path, "username", body.username);
        let email = rules::required_text(v, path, "email", body.email)
            .filter(|e| rules::email(v, &field(path, "email"), e));
        let password = rules::required_text(v, path, "password", body.password);

        Some(Registration {
            username: username?,
            email: email?,
            password: password?,
        })
    }
}

impl Validate for UserView {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        rules::text(v, &field(path, "id"), &self.id);
        rules::text(v, &field(path, "username"), &self.username);
        rules::email(v, &field(path, "email"), &self.email);
    }
}

impl Validate for AuthResponse {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        self.user.validate_at(&field(path, "user"), v);
        rules::text(v, &field(path, "token"), &self.token);
    }
}

// ============================================================================
// Workouts
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ExerciseBody {
    name: Option<String>,
    sets: Option<i64>,
    reps: Option<i64>,
    weight: Option<f64>,
}

fn exercise(v: &mut Violations, path: &str, body: ExerciseBody) -> Option<Exercise> {
    let name = rules::required_text(v, path, "name", body.name);
    let sets = rules::required(v, path, "sets", body.sets)
        .filter(|n| count(v, &field(path, "sets"), *n));
    let reps = rules::required(v, path, "reps", body.reps)
        .filter(|n| count(v, &field(path, "reps"), *n));
    let weight = Some(body.weight.unwrap_or(0.0))
        .filter(|w| bounded(v, &field(path, "weight"), *w, MAX_WEIGHT));

    Some(Exercise {
        name: name?,
        sets: sets?,
        reps: reps?,
        weight: weight?,
    })
}

fn exercise_list(
    v: &mut Violations,
    path: &str,
    items: Vec<ExerciseBody>,
) -> Option<Vec<Exercise>> {
    let parsed: Vec<Option<Exercise>> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| exercise(v, &index(path, i), item))
        .collect();
    parsed.into_iter().collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutBody {
    user_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    date: Option<String>,
    exercises: Option<Vec<ExerciseBody>>,
}

impl FromBody for NewWorkout {
    type Body = WorkoutBody;

    fn from_body(body: WorkoutBody, path: &str, v: &mut Violations) -> Option<Self> {
        let user_id = rules::required_text(v, path, "userId", body.user_id);
        let name = rules::required_text(v, path, "name", body.name);
        let date = rules::required(v, path, "date", body.date)
            .and_then(|d| rules::date(v, &field(path, "date"), &d));
        let exercises = exercise_list(
            v,
            &field(path, "exercises"),
            body.exercises.unwrap_or_default(),
        );

        Some(NewWorkout {
            user_id: user_id?,
            name: name?,
            description: body.description,
            date: date?,
            exercises: exercises?,
        })
    }
}

impl FromBody for WorkoutPatch {
    type Body = WorkoutBody;

    fn from_body(body: WorkoutBody, path: &str, v: &mut Violations) -> Option<Self> {
        let user_id = optional_text(v, path, "userId", body.user_id);
        let name = optional_text(v, path, "name", body.name);
        let date = match body.date {
            Some(d) => rules::date(v, &field(path, "date"), &d).map(Some),
            None => Some(None),
        };
        let exercises = match body.exercises {
            Some(items) => exercise_list(v, &field(path, "exercises"), items).map(Some),
            None => Some(None),
        };

        Some(WorkoutPatch {
            user_id: user_id?,
            name: name?,
            description: body.description,
            date: date?,
            exercises: exercises?,
        })
    }
}

impl Validate for Exercise {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        rules::text(v, &field(path, "name"), &self.name);
        count(v, &field(path, "sets"), self.sets);
        count(v, &field(path, "reps"), self.reps);
        bounded(v, &field(path, "weight"), self.weight, MAX_WEIGHT);
    }
}

impl Validate for Workout {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        rules::text(v, &field(path, "id"), &self.id);
        rules::text(v, &field(path, "userId"), &self.user_id);
        rules::text(v, &field(path, "name"), &self.name);
        self.exercises.validate_at(&field(path, "exercises"), v);
    }
}

impl Validate for WorkoutStats {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        rules::text(v, &field(path, "workoutId"), &self.workout_id);
        rules::non_negative_int(v, &field(path, "totalSets"), self.total_sets);
        rules::non_negative_int(v, &field(path, "totalReps"), self.total_reps);
        rules::non_negative(v, &field(path, "totalWeight"), self.total_weight);
        rules::non_negative(
            v,
            &field(path, "averageWeightPerExercise"),
            self.average_weight_per_exercise,
        );
        rules::non_negative(
            v,
            &field(path, "estimatedCaloriesBurned"),
            self.estimated_calories_burned,
        );
    }
}

// ============================================================================
// Meals
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FoodBody {
    name: Option<String>,
    quantity: Option<f64>,
    calories: Option<f64>,
}

fn food(v: &mut Violations, path: &str, body: FoodBody) -> Option<Food> {
    let name = rules::required_text(v, path, "name", body.name);
    let quantity = rules::required(v, path, "quantity", body.quantity)
        .filter(|q| bounded(v, &field(path, "quantity"), *q, MAX_QUANTITY));
    let calories = rules::required(v, path, "calories", body.calories)
        .filter(|c| bounded(v, &field(path, "calories"), *c, MAX_CALORIES));

    Some(Food {
        name: name?,
        quantity: quantity?,
        calories: calories?,
    })
}

fn food_list(v: &mut Violations, path: &str, items: Vec<FoodBody>) -> Option<Vec<Food>> {
    let parsed: Vec<Option<Food>> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| food(v, &index(path, i), item))
        .collect();
    parsed.into_iter().collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealBody {
    user_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    date: Option<String>,
    foods: Option<Vec<FoodBody>>,
}

impl FromBody for NewMeal {
    type Body = MealBody;

    fn from_body(body: MealBody, path: &str, v: &mut Violations) -> Option<Self> {
        let user_id = rules::required_text(v, path, "userId", body.user_id);
        let name = rules::required_text(v, path, "name", body.name);
        let date = rules::required(v, path, "date", body.date)
            .and_then(|d| rules::date(v, &field(path, "date"), &d));
        let foods = food_list(v, &field(path, "foods"), body.foods.unwrap_or_default());

        Some(NewMeal {
            user_id: user_id?,
            name: name?,
            description: body.description,
            date: date?,
            foods: foods?,
        })
    }
}

impl FromBody for MealPatch {
    type Body = MealBody;

    fn from_body(body: MealBody, path: &str, v: &mut Violations) -> Option<Self> {
        let user_id = optional_text(v, path, "userId", body.user_id);
        let name = optional_text(v, path, "name", body.name);
        let date = match body.date {
            Some(d) => rules::date(v, &field(path, "date"), &d).map(Some),
            None => Some(None),
        };
        let foods = match body.foods {
            Some(items) => food_list(v, &field(path, "foods"), items).map(Some),
            None => Some(None),
        };

        Some(MealPatch {
            user_id: user_id?,
            name: name?,
            description: body.description,
            date: date?,
            foods: foods?,
        })
    }
}

impl Validate for Food {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        rules::text(v, &field(path, "name"), &self.name);
        bounded(v, &field(path, "quantity"), self.quantity, MAX_QUANTITY);
        bounded(v, &field(path, "calories"), self.calories, MAX_CALORIES);
    }
}

impl Validate for Meal {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        rules::text(v, &field(path, "id"), &self.id);
        rules::text(v, &field(path, "userId"), &self.user_id);
        rules::text(v, &field(path, "name"), &self.name);
        self.foods.validate_at(&field(path, "foods"), v);
    }
}

impl Validate for MealStats {
    fn validate_at(&self, path: &str, v: &mut Violations) {
        rules::text(v, &field(path, "mealId"), &self.meal_id);
        rules::non_negative(v, &field(path, "totalCalories"), self.total_calories);
        rules::non_negative(
            v,
            &field(path, "estimatedCalories"),
            self.estimated_calories,
        );
    }
}

// ============================================================================
// Shared
// ============================================================================

/// Query string for the list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

impl ListQuery {
    /// The required `userId` parameter.
    pub fn user_id(self) -> Result<String, AppError> {
        let mut v = Violations::default();
        rules::required_text(&mut v, "query", "userId", self.user_id)
            .ok_or_else(|| AppError::invalid_body(v.into_vec()))
    }
}

/// Body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl Validate for DeleteResponse {
    fn validate_at(&self, _path: &str, _v: &mut Violations) {}
}

/// An optional field that must be non-empty when present. Outer `None` means invalid.
fn optional_text(
    v: &mut Violations,
    path: &str,
    name: &str,
    value: Option<String>,
) -> Option<Option<String>> {
    match value {
        Some(s) => rules::text(v, &field(path, name), &s).then_some(Some(s)),
        None => Some(None),
    }
}
