use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_date, parse_json, parse_timestamp};
use crate::models::{Food, Meal, MealPatch, NewMeal};

#[derive(Clone)]
pub struct MealRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MealRow {
    id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    date: String,
    foods: String,
    revision: i64,
    created_at: String,
    updated_at: String,
}

impl MealRow {
    /// Drops the revision counter and decodes the JSON columns.
    fn into_meal(self) -> Result<Meal, sqlx::Error> {
        Ok(Meal {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            date: parse_date(&self.date)?,
            foods: parse_json(&self.foods)?,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

fn foods_json(foods: &[Food]) -> String {
    serde_json::to_string(foods).unwrap_or_else(|_| "[]".to_string())
}

impl MealRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, meal: &NewMeal) -> Result<Meal, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, name, description, date, foods, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&meal.user_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.date.to_string())
        .bind(foods_json(&meal.foods))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Meal>, sqlx::Error> {
        let row: Option<MealRow> = sqlx::query_as("SELECT * FROM meals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(MealRow::into_meal).transpose()
    }

    /// All meals for a user, in creation order.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Meal>, sqlx::Error> {
        let rows: Vec<MealRow> =
            sqlx::query_as("SELECT * FROM meals WHERE user_id = ? ORDER BY rowid")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(MealRow::into_meal).collect()
    }

    /// Applies the set fields of `patch`. Returns `None` if no meal has `id`.
    pub async fn update(&self, id: &str, patch: &MealPatch) -> Result<Option<Meal>, sqlx::Error> {
        let foods = patch.foods.as_deref().map(foods_json);
        let date = patch.date.map(|d| d.to_string());
        let updated_at = Utc::now().to_rfc3339();

        let row: Option<MealRow> = sqlx::query_as(
            r#"
            UPDATE meals
            SET user_id = COALESCE(?, user_id),
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                date = COALESCE(?, date),
                foods = COALESCE(?, foods),
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
        .bind(&foods)
        .bind(&updated_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            tracing::debug!("Updated meal {} to revision {}", row.id, row.revision);
        }
        row.map(MealRow::into_meal).transpose()
    }

    /// Returns true iff a meal was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
