//! FitTrack API server
//!
//! Serves the user, workout and meal REST API backed by SQLite.
//!
//! # Configuration
//!
//! Read from `--config` (default: ~/.config/fittrack/config.yaml), then
//! overridden by environment variables:
//! - `FITTRACK_PORT`: Port to listen on (default: 8080)
//! - `FITTRACK_DATABASE_PATH`: SQLite file (default: ~/.local/share/fittrack/fittrack.db)
//! - `FITTRACK_JWT_SECRET`: Token signing secret (required)
//! - `FITTRACK_COMPLETION_API_KEY`: Enables calorie estimates
//!
//! # Config File Format
//!
//! ```yaml
//! port: 8080
//! jwt_secret: "change-me"
//! token_expiry_hours: 24
//! completion:
//!   api_key: "sk-..."
//!   model: "gpt-4o-mini"
//!   timeout_secs: 10
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fittrack::auth::TokenIssuer;
use fittrack::completion::CalorieEstimator;
use fittrack::config::Config;
use fittrack::db::init_db;
use fittrack::server::{router, AppState};

#[derive(Parser)]
#[command(name = "fittrack-server")]
#[command(about = "Fitness tracking REST API", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fittrack=info,fittrack_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let secret = match config.require_jwt_secret() {
        Ok(secret) => secret,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let tokens = TokenIssuer::new(secret, config.token_expiry_hours);

    tracing::info!("Database: {}", config.database_path.display());
    let pool = match init_db(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let estimator = CalorieEstimator::from_config(&config.completion);
    let state = AppState::new(pool, tokens, estimator, config.password_hash_cost);
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
