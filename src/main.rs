//! SafeHeart - Main Entry Point
//!
//! Trains the heart disease classifier at startup and serves the dashboard.

use clap::Parser;
use safeheart::cli::{cmd_info, cmd_predict, cmd_serve, Cli, Commands};
use safeheart::model::PredictionRequest;
use safeheart::server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safeheart=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Serve { host, port }) => {
            cmd_serve(cli.server_config(host, *port)).await?;
        }
        Some(Commands::Predict { sex, age, height, weight, bmi, diabetes, arthritis }) => {
            let request = PredictionRequest::new(sex, age, *height, *weight, *bmi, diabetes, arthritis);
            cmd_predict(&cli.data, &cli.trainer_config(), &request)?;
        }
        Some(Commands::Info) => {
            cmd_info(&cli.data)?;
        }
        None => {
            let defaults = ServerConfig::default();
            cmd_serve(cli.server_config(&defaults.host, defaults.port)).await?;
        }
    }

    Ok(())
}
