use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use super::extract::{respond, UserIdQuery, ValidatedJson};
use super::schema::DeleteResponse;
use super::AppState;
use crate::error::AppError;
use crate::models::{NewWorkout, WorkoutPatch};

pub async fn list(
    State(state): State<AppState>,
    UserIdQuery(user_id): UserIdQuery,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.workouts.list(&user_id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(workout): ValidatedJson<NewWorkout>,
) -> Result<Response, AppError> {
    respond(StatusCode::CREATED, state.workouts.create(workout).await?)
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.workouts.get(&id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<WorkoutPatch>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.workouts.update(&id, patch).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.workouts.delete(&id).await?;
    respond(StatusCode::OK, DeleteResponse { success: true })
}

/// `GET /workouts/{id}/stats`
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.workouts.compute_stats(&id).await?)
}
