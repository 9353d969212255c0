//! User signup, login and the current-user endpoint.

use axum::{extract::State, http::StatusCode, response::Response, Extension};

use super::extract::{respond, ValidatedJson};
use super::{AppState, AuthUser};
use crate::error::AppError;
use crate::models::{Credentials, Registration};

/// `POST /user/login`
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.auth.authenticate(credentials).await?)
}

/// `POST /user/signup`
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(registration): ValidatedJson<Registration>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.auth.register(registration).await?)
}

/// `GET /user/me`, behind the auth middleware.
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, AppError> {
    respond(StatusCode::OK, state.auth.get_user(&user.user_id).await?)
}
