use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One exercise within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: i64,
    pub reps: i64,
    #[serde(default)]
    pub weight: f64,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: i64, reps: i64, weight: f64) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            weight,
        }
    }
}

/// Externally visible workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a new workout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
}

impl NewWorkout {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            date,
            exercises: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<Exercise>) -> Self {
        self.exercises = exercises;
        self
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub exercises: Option<Vec<Exercise>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workout_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let workout = NewWorkout::new("u1", "Leg Day", date)
            .with_description("Squats mostly")
            .with_exercises(vec![Exercise::new("Squat", 5, 5, 120.0)]);

        assert_eq!(workout.user_id, "u1");
        assert_eq!(workout.description.as_deref(), Some("Squats mostly"));
        assert_eq!(workout.exercises.len(), 1);
    }

    #[test]
    fn test_workout_serializes_camel_case() {
        let now = Utc::now();
        let workout = Workout {
            id: "w1".to_string(),
            user_id: "u1".to_string(),
            name: "Leg Day".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            exercises: vec![],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&workout).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["date"], "2024-01-01");
        assert!(json.get("description").is_none());
        assert!(json.get("revision").is_none());
    }

    #[test]
    fn test_exercise_weight_defaults_to_zero() {
        let exercise: Exercise =
            serde_json::from_str(r#"{"name":"Push-up","sets":3,"reps":20}"#).unwrap();
        assert_eq!(exercise.weight, 0.0);
    }
}
