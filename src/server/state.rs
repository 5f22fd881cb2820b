//! Application state management

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::dashboard::DashboardController;
use crate::dataset::CvdDataset;
use crate::error::Result;
use crate::figures::ExploratoryCharts;
use crate::model::HeartDiseasePredictor;

use super::ServerConfig;

/// Everything built once at startup, shared read-only by all handlers
pub struct AppState {
    pub config: ServerConfig,
    pub dataset: Arc<CvdDataset>,
    pub predictor: Arc<HeartDiseasePredictor>,
    pub dashboard: DashboardController,
    pub charts: Arc<ExploratoryCharts>,
    /// Serialized charts, served as-is
    pub charts_json: Bytes,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Assemble state around an already fitted predictor
    pub fn new(config: ServerConfig, dataset: CvdDataset, predictor: HeartDiseasePredictor) -> Result<Self> {
        let start = Instant::now();
        let dataset = Arc::new(dataset);
        let predictor = Arc::new(predictor);

        let charts = ExploratoryCharts::build(&dataset);
        let charts_json = Bytes::from(serde_json::to_vec(&charts)?);
        info!(
            charts = charts.len(),
            bytes = charts_json.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built exploratory charts"
        );

        Ok(Self {
            config,
            dashboard: DashboardController::new(Arc::clone(&dataset), Arc::clone(&predictor)),
            dataset,
            predictor,
            charts: Arc::new(charts),
            charts_json,
            started_at: Utc::now(),
        })
    }

    /// Fit the predictor with the configured trainer settings, then assemble state
    pub fn train(config: ServerConfig, dataset: CvdDataset) -> Result<Self> {
        let predictor = HeartDiseasePredictor::train(&dataset, &config.trainer)?;
        Self::new(config, dataset, predictor)
    }

    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }
}
