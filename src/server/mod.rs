//! HTTP surface: router, shared state and auth middleware.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (no auth)
//! - `POST /user/signup`, `POST /user/login`: Issue a token
//! - `GET /user/me`: Current user (Bearer token required)
//! - `GET|POST /workouts`, `GET|PUT|DELETE /workouts/{id}`, `GET /workouts/{id}/stats`
//! - `GET|POST /meals`, `GET|PUT|DELETE /meals/{id}`, `GET /meals/{id}/stats`

mod extract;
mod meals;
pub mod schema;
mod users;
mod workouts;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::auth::{TokenError, TokenIssuer};
use crate::completion::CalorieEstimator;
use crate::db::{MealRepository, UserRepository, WorkoutRepository};
use crate::error::AppError;
use crate::services::{AuthService, MealService, WorkoutService};

pub use extract::{respond, ValidatedJson};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub workouts: WorkoutService,
    pub meals: MealService,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        tokens: TokenIssuer,
        estimator: CalorieEstimator,
        password_hash_cost: u32,
    ) -> Self {
        Self {
            auth: AuthService::new(
                UserRepository::new(pool.clone()),
                Arc::new(tokens),
                password_hash_cost,
            ),
            workouts: WorkoutService::new(WorkoutRepository::new(pool.clone()), estimator.clone()),
            meals: MealService::new(MealRepository::new(pool), estimator),
        }
    }
}

/// Authenticated user info, added to request extensions after auth
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Bearer token middleware
async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        Some(_) => {
            return AppError::Unauthorized {
                code: "invalid_auth",
                message: "Authorization header must use Bearer scheme",
            }
            .into_response();
        }
        None => {
            return AppError::Unauthorized {
                code: "missing_auth",
                message: "Authorization header required",
            }
            .into_response();
        }
    };

    match state.auth.tokens().verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                user_id: claims.sub,
                email: claims.email,
            });
            next.run(request).await
        }
        Err(TokenError::Expired) => AppError::Unauthorized {
            code: "expired_token",
            message: "Token has expired",
        }
        .into_response(),
        Err(e) => {
            tracing::debug!("Rejected token: {}", e);
            AppError::Unauthorized {
                code: "invalid_token",
                message: "Invalid token",
            }
            .into_response()
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::version(),
    })
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/user/signup", post(users::signup))
        .route("/user/login", post(users::login))
        .route("/workouts", get(workouts::list).post(workouts::create))
        .route(
            "/workouts/{id}",
            get(workouts::show)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route("/workouts/{id}/stats", get(workouts::stats))
        .route("/meals", get(meals::list).post(meals::create))
        .route(
            "/meals/{id}",
            get(meals::show).put(meals::update).delete(meals::delete),
        )
        .route("/meals/{id}/stats", get(meals::stats));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/user/me", get(users::me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
