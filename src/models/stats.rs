use serde::{Deserialize, Serialize};

use super::meal::Food;
use super::workout::Exercise;

/// Total weight volume above which a workout counts as high intensity.
pub const HIGH_INTENSITY_VOLUME: f64 = 5000.0;
/// Total weight volume above which a workout counts as medium intensity.
pub const MEDIUM_INTENSITY_VOLUME: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Classifies a workout by its total weight volume.
    pub fn from_volume(total_weight: f64) -> Self {
        if total_weight > HIGH_INTENSITY_VOLUME {
            Intensity::High
        } else if total_weight > MEDIUM_INTENSITY_VOLUME {
            Intensity::Medium
        } else {
            Intensity::Low
        }
    }
}

/// Deterministic aggregates over a workout's exercises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutTotals {
    pub total_sets: i64,
    pub total_reps: i64,
    pub total_weight: f64,
    pub average_weight_per_exercise: f64,
    pub intensity: Intensity,
}

impl WorkoutTotals {
    /// Integer totals saturate at `i64::MAX` instead of overflowing.
    pub fn from_exercises(exercises: &[Exercise]) -> Self {
        let total_sets = exercises
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.sets));
        let total_reps = exercises
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.sets.saturating_mul(e.reps)));
        let total_weight: f64 = exercises
            .iter()
            .map(|e| e.weight * e.sets as f64 * e.reps as f64)
            .sum();

        let average_weight_per_exercise = if exercises.is_empty() {
            0.0
        } else {
            total_weight / exercises.len() as f64
        };

        Self {
            total_sets,
            total_reps,
            total_weight,
            average_weight_per_exercise,
            intensity: Intensity::from_volume(total_weight),
        }
    }
}

/// Deterministic aggregates over a meal's foods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealTotals {
    pub total_calories: f64,
}

impl MealTotals {
    pub fn from_foods(foods: &[Food]) -> Self {
        Self {
            total_calories: foods.iter().map(|f| f.calories).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub workout_id: String,
    pub total_sets: i64,
    pub total_reps: i64,
    pub total_weight: f64,
    pub average_weight_per_exercise: f64,
    pub intensity: Intensity,
    pub estimated_calories_burned: f64,
}

impl WorkoutStats {
    pub fn new(workout_id: impl Into<String>, totals: WorkoutTotals, estimate: f64) -> Self {
        Self {
            workout_id: workout_id.into(),
            total_sets: totals.total_sets,
            total_reps: totals.total_reps,
            total_weight: totals.total_weight,
            average_weight_per_exercise: totals.average_weight_per_exercise,
            intensity: totals.intensity,
            estimated_calories_burned: estimate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStats {
    pub meal_id: String,
    pub total_calories: f64,
    pub estimated_calories: f64,
}

impl MealStats {
    pub fn new(meal_id: impl Into<String>, totals: MealTotals, estimate: f64) -> Self {
        Self {
            meal_id: meal_id.into(),
            total_calories: totals.total_calories,
            estimated_calories: estimate,
        }
    }
}
