//! Shared setup for HTTP integration tests.
//!
//! Routes are exercised in-process with `tower::ServiceExt::oneshot`, against
//! a throwaway SQLite file and a scripted completion client.

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use fittrack::auth::TokenIssuer;
use fittrack::completion::{CalorieEstimator, CompletionClient, CompletionError};
use fittrack::db::init_db;
use fittrack::server::{router, AppState};

/// Completion client that replies with a fixed text, or fails when `None`.
pub struct ScriptedCompletion(pub Option<&'static str>);

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        self.0
            .map(str::to_string)
            .ok_or(CompletionError::EmptyResponse)
    }
}

/// Router plus the temp dir that keeps its database alive.
pub struct TestApp {
    pub router: Router,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new(completion: Option<&'static str>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();

        let estimator = CalorieEstimator::new(
            Arc::new(ScriptedCompletion(completion)),
            Duration::from_millis(200),
        );
        let state = AppState::new(pool, TokenIssuer::new("test-secret", 1), estimator, 4);

        Self {
            router: router(state),
            _temp_dir: temp_dir,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, None).await
    }

    pub async fn get_with_token(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, Some(token)).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
