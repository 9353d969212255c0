//! Best-effort calorie estimates from an LLM completion service.
//!
//! The service is reached through the [`CompletionClient`] trait so tests can
//! swap in a deterministic fake. [`CalorieEstimator`] wraps a client with a
//! timeout and number extraction; it never returns an error, only `None`
//! when no usable estimate came back.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use thiserror::Error;

use crate::config::CompletionConfig;

const SYSTEM_PROMPT: &str =
    "You are a nutrition and fitness assistant. Answer with a single whole number of calories and nothing else.";

/// Errors from the completion service. Never surfaced to API callers.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion service is not configured")]
    NotConfigured,
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Response contained no completion text")]
    EmptyResponse,
}

/// A text completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends a single prompt and returns the reply text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

// ============================================================================
// OpenAI-compatible client
// ============================================================================

/// Chat completion request (OpenAI-compatible)
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion response (OpenAI-compatible)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for any `/chat/completions` endpoint speaking the OpenAI format
/// (OpenAI, Groq, Ollama, vLLM).
pub struct OpenAiCompatibleClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleClient {
    /// Returns `NotConfigured` when no API key is set.
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(CompletionError::NotConfigured)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
            max_tokens: 16,
        };

        tracing::debug!("Requesting completion from {} ({})", self.endpoint(), self.model);

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Stand-in used when no completion service is configured.
#[derive(Debug, Default)]
pub struct DisabledCompletion;

#[async_trait]
impl CompletionClient for DisabledCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured)
    }
}

// ============================================================================
// Estimator
// ============================================================================

static FIRST_INTEGER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d+").ok());

/// Returns the first run of digits in `text`, if it fits in an `i64`.
pub fn extract_first_integer(text: &str) -> Option<i64> {
    let re = FIRST_INTEGER.as_ref()?;
    re.find(text)?.as_str().parse().ok()
}

/// Bounded calorie estimation over a [`CompletionClient`].
#[derive(Clone)]
pub struct CalorieEstimator {
    client: Arc<dyn CompletionClient>,
    timeout: Duration,
}

impl CalorieEstimator {
    pub fn new(client: Arc<dyn CompletionClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds the estimator from config, disabled when no API key is set.
    pub fn from_config(config: &CompletionConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client: Arc<dyn CompletionClient> = match OpenAiCompatibleClient::from_config(config) {
            Ok(client) => {
                tracing::info!("Calorie estimates enabled ({:?})", client);
                Arc::new(client)
            }
            Err(CompletionError::NotConfigured) => {
                tracing::info!("No completion API key set, calorie estimates disabled");
                Arc::new(DisabledCompletion)
            }
            Err(e) => {
                tracing::warn!("Failed to build completion client, estimates disabled: {}", e);
                Arc::new(DisabledCompletion)
            }
        };
        Self::new(client, timeout)
    }

    /// Asks for an estimate. Returns `None` unless a positive integer came back
    /// within the timeout.
    pub async fn estimate(&self, prompt: &str) -> Option<i64> {
        match tokio::time::timeout(self.timeout, self.client.complete(prompt)).await {
            Ok(Ok(text)) => {
                let value = extract_first_integer(&text).filter(|n| *n > 0);
                if value.is_none() {
                    tracing::warn!("No usable calorie estimate in completion: {:?}", text);
                }
                value
            }
            Ok(Err(CompletionError::NotConfigured)) => None,
            Ok(Err(e)) => {
                tracing::warn!("Calorie estimate failed: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!("Calorie estimate timed out after {:?}", self.timeout);
                None
            }
        }
    }
}

impl std::fmt::Debug for CalorieEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalorieEstimator")
            .field("timeout", &self.timeout)
            .finish()
    }
}
