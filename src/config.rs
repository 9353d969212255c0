use serde::Deserialize;
use std::path::PathBuf;

/// Completion service settings for calorie estimates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// API key; estimates are disabled when unset
    pub api_key: Option<String>,
    /// Model name sent with each request
    pub model: String,
    /// Upper bound on a single estimate call
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: PathBuf,
    /// Port to listen on
    pub port: u16,
    /// Secret used to sign auth tokens
    pub jwt_secret: Option<String>,
    /// Token validity window
    pub token_expiry_hours: i64,
    /// bcrypt work factor
    pub password_hash_cost: u32,
    pub completion: CompletionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fittrack")
                .join("fittrack.db"),
            port: 8080,
            jwt_secret: None,
            token_expiry_hours: 24,
            password_hash_cost: bcrypt::DEFAULT_COST,
            completion: CompletionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(db_path) = std::env::var("FITTRACK_DATABASE_PATH") {
            self.database_path = PathBuf::from(db_path);
        }
        if let Some(port) = env_parsed("FITTRACK_PORT")? {
            self.port = port;
        }
        if let Ok(secret) = std::env::var("FITTRACK_JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(hours) = env_parsed("FITTRACK_TOKEN_EXPIRY_HOURS")? {
            self.token_expiry_hours = hours;
        }
        if let Some(cost) = env_parsed("FITTRACK_PASSWORD_HASH_COST")? {
            self.password_hash_cost = cost;
        }
        if let Ok(url) = std::env::var("FITTRACK_COMPLETION_BASE_URL") {
            self.completion.base_url = url;
        }
        if let Ok(key) = std::env::var("FITTRACK_COMPLETION_API_KEY") {
            self.completion.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("FITTRACK_COMPLETION_MODEL") {
            self.completion.model = model;
        }
        if let Some(secs) = env_parsed("FITTRACK_COMPLETION_TIMEOUT_SECS")? {
            self.completion.timeout_secs = secs;
        }
        Ok(())
    }

    /// The signing secret, which has no usable default.
    pub fn require_jwt_secret(&self) -> Result<&str, ConfigError> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(ConfigError::Missing("jwt_secret (or FITTRACK_JWT_SECRET)")),
        }
    }

    /// Default config file path: ~/.config/fittrack/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fittrack")
            .join("config.yaml")
    }
}

fn env_parsed<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv(name, value)),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    ParseError(PathBuf, serde_yaml::Error),
    #[error("Invalid value for {0}: '{1}'")]
    InvalidEnv(&'static str, String),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}
