use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use super::extract::{respond, UserIdQuery, ValidatedJson};
use super::schema::DeleteResponse;
use super::AppState;
use crate::error::AppError;
use crate::models::{MealPatch, NewMeal};

pub async fn list(
    State(state): State<AppState>,
    UserIdQuery(user_id): UserIdQuery,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.meals.list(&user_id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(meal): ValidatedJson<NewMeal>,
) -> Result<Response, AppError> {
    respond(StatusCode::CREATED, state.meals.create(meal).await?)
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.meals.get(&id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<MealPatch>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.meals.update(&id, patch).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.meals.delete(&id).await?;
    respond(StatusCode::OK, DeleteResponse { success: true })
}

/// `GET /meals/{id}/stats`
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.meals.compute_stats(&id).await?)
}
