//! SafeHeart - heart disease risk dashboard
//!
//! Loads a cardiovascular survey once, fits a random forest on it and
//! serves predictions plus exploratory charts through a web UI.
//!
//! # Modules
//!
//! ## Model
//! - [`dataset`] - CSV loading into typed survey records
//! - [`preprocessing`] - Label encoding and the seeded train/test split
//! - [`training`] - Decision trees and the random forest
//! - [`model`] - Fitted predictor and the feature order contract
//!
//! ## Dashboard
//! - [`figures`] - Plotly figure JSON for scatter plots and charts
//! - [`dashboard`] - Form submission to rendered view
//!
//! ## Services
//! - [`server`] - HTTP server with the embedded UI and JSON API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Model
pub mod dataset;
pub mod preprocessing;
pub mod training;
pub mod model;

// Dashboard
pub mod figures;
pub mod dashboard;

// Services
pub mod server;
pub mod cli;

pub use error::{Result, SafeHeartError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, SafeHeartError};
    pub use crate::dataset::{CvdDataset, CvdRecord, DataLoader};
    pub use crate::preprocessing::{CategoricalEncoders, LabelEncoder};
    pub use crate::training::{DecisionTree, RandomForest};
    pub use crate::model::{
        FieldValue, HeartDiseasePredictor, PredictionRequest, PredictionResult, TrainerConfig,
        FEATURE_ORDER,
    };
    pub use crate::figures::{ExploratoryCharts, Figure};
    pub use crate::dashboard::{DashboardController, DashboardView};
    pub use crate::server::{AppState, ServerConfig};
}
