mod meal;
mod stats;
mod user;
mod workout;

pub use meal::{Food, Meal, MealPatch, NewMeal};
pub use stats::{Intensity, MealStats, MealTotals, WorkoutStats, WorkoutTotals};
pub use user::{AuthResponse, Credentials, NewUser, Registration, UserRecord, UserView};
pub use workout::{Exercise, NewWorkout, Workout, WorkoutPatch};
