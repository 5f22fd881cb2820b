//! SafeHeart Server Module
//!
//! Web server for the dashboard. Serves the embedded UI and a small JSON
//! API for predictions, the annotated scatter plots and the exploratory
//! charts.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dataset::DataLoader;
use crate::model::TrainerConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub cors_origin: Option<String>,
    pub trainer: TrainerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: port_from_env(std::env::var("PORT").ok().as_deref()),
            data_path: std::env::var("SAFEHEART_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("CVD_cleaned_v2.csv")),
            cors_origin: std::env::var("CORS_ORIGIN").ok(),
            trainer: TrainerConfig::default(),
        }
    }
}

const DEFAULT_PORT: u16 = 8050;

fn port_from_env(value: Option<&str>) -> u16 {
    match value {
        None => DEFAULT_PORT,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(port = raw, error = %e, default = DEFAULT_PORT, "Ignoring invalid PORT");
            DEFAULT_PORT
        }),
    }
}

/// Load the dataset, fit the model and serve until ctrl+c
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        data_path = %config.data_path.display(),
        trees = config.trainer.n_estimators,
        seed = config.trainer.random_state,
        started_at = %start_time.to_rfc3339(),
        "Loading dataset and training model"
    );

    let build_config = config.clone();
    let state = tokio::task::spawn_blocking(move || {
        let dataset = DataLoader::new().load_dataset(&build_config.data_path)?;
        AppState::train(build_config, dataset)
    })
    .await??;
    let state = Arc::new(state);
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        host = %config.host,
        port = config.port,
        address = %addr,
        "SafeHeart server starting"
    );
    info!(url = %format!("http://{}", addr), "Dashboard available");
    info!(url = %format!("http://{}/api/health", addr), "Health endpoint available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c, shutting down");
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
