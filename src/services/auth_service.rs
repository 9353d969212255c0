use std::sync::Arc;

use crate::auth::{hash_password, verify_password, TokenIssuer};
use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::{AuthResponse, Credentials, NewUser, Registration, UserView};

/// User signup, login and lookup.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    tokens: Arc<TokenIssuer>,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(users: UserRepository, tokens: Arc<TokenIssuer>, hash_cost: u32) -> Self {
        Self {
            users,
            tokens,
            hash_cost,
        }
    }

    /// Logs a user in. Unknown email and wrong password fail identically.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<AuthResponse, AppError> {
        let Some(record) = self.users.find_by_email(&credentials.email).await? else {
            tracing::debug!("Login for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(&credentials.password, &record.password_hash).await? {
            tracing::debug!("Login with wrong password for user {}", record.id);
            return Err(AppError::InvalidCredentials);
        }

        let user = UserView::from(record);
        let token = self.issue_token(&user)?;
        tracing::info!("User {} logged in", user.id);
        Ok(AuthResponse { user, token })
    }

    /// Creates a user and logs them in.
    pub async fn register(&self, registration: Registration) -> Result<AuthResponse, AppError> {
        let Registration {
            username,
            email,
            password,
        } = registration;

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::validation(
                "username, email and password are required",
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Duplicate("User already exists".to_string()));
        }

        let password_hash = hash_password(&password, self.hash_cost).await?;
        let user = self
            .users
            .create(&NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match AppError::from(e) {
                // Lost a race with a concurrent signup for the same email
                AppError::Duplicate(_) => AppError::Duplicate("User already exists".to_string()),
                other => other,
            })?;

        let token = self.issue_token(&user)?;
        tracing::info!("Registered user {}", user.id);
        Ok(AuthResponse { user, token })
    }

    pub async fn get_user(&self, id: &str) -> Result<UserView, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    fn issue_token(&self, user: &UserView) -> Result<String, AppError> {
        self.tokens
            .issue(&user.id, &user.email)
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
