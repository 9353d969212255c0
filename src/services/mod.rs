//! Domain service layer: business rules independent of HTTP and storage.

mod auth_service;
mod meal_service;
mod workout_service;

pub use auth_service::AuthService;
pub use meal_service::MealService;
pub use workout_service::WorkoutService;
