use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One food item within a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub name: String,
    pub quantity: f64,
    pub calories: f64,
}

impl Food {
    pub fn new(name: impl Into<String>, quantity: f64, calories: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            calories,
        }
    }
}

/// Externally visible meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub foods: Vec<Food>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a new meal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub foods: Vec<Food>,
}

impl NewMeal {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            date,
            foods: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_foods(mut self, foods: Vec<Food>) -> Self {
        self.foods = foods;
        self
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealPatch {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub foods: Option<Vec<Food>>,
}
