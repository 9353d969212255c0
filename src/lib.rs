//! fittrack
//!
//! REST backend for tracking workouts and meals, with user signup/login and
//! per-record statistics enriched by an optional LLM calorie estimate.

pub mod auth;
pub mod completion;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod validation;

pub use error::AppError;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
