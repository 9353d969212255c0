use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_date, parse_json, parse_timestamp};
use crate::models::{Exercise, NewWorkout, Workout, WorkoutPatch};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct WorkoutRow {
    id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    date: String,
    exercises: String,
    revision: i64,
    created_at: String,
    updated_at: String,
}

impl WorkoutRow {
    /// Drops the revision counter and decodes the JSON columns.
    fn into_workout(self) -> Result<Workout, sqlx::Error> {
        Ok(Workout {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            date: parse_date(&self.date)?,
            exercises: parse_json(&self.exercises)?,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

fn exercises_json(exercises: &[Exercise]) -> String {
    serde_json::to_string(exercises).unwrap_or_else(|_| "[]".to_string())
}

impl WorkoutRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, workout: &NewWorkout) -> Result<Workout, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO workouts (id, user_id, name, description, date, exercises, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&workout.user_id)
        .bind(&workout.name)
        .bind(&workout.description)
        .bind(workout.date.to_string())
        .bind(exercises_json(&workout.exercises))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Workout>, sqlx::Error> {
        let row: Option<WorkoutRow> = sqlx::query_as("SELECT * FROM workouts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(WorkoutRow::into_workout).transpose()
    }

    /// All workouts for a user, in creation order.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Workout>, sqlx::Error> {
        let rows: Vec<WorkoutRow> =
            sqlx::query_as("SELECT * FROM workouts WHERE user_id = ? ORDER BY rowid")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(WorkoutRow::into_workout).collect()
    }

    /// Applies the set fields of `patch`. Returns `None` if no workout has `id`.
    pub async fn update(
        &self,
        id: &str,
        patch: &WorkoutPatch,
    ) -> Result<Option<Workout>, sqlx::Error> {
        let exercises = patch.exercises.as_deref().map(exercises_json);
        let date = patch.date.map(|d| d.to_string());
        let updated_at = Utc::now().to_rfc3339();

        let row: Option<WorkoutRow> = sqlx::query_as(
            r#"
            UPDATE workouts
            SET user_id = COALESCE(?, user_id),
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                date = COALESCE(?, date),
                exercises = COALESCE(?, exercises),
                revision = revision + 1,
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&patch.user_id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(&date)
        .bind(&exercises)
        .bind(&updated_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            tracing::debug!("Updated workout {} to revision {}", row.id, row.revision);
        }
        row.map(WorkoutRow::into_workout).transpose()
    }

    /// Returns true iff a workout was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
