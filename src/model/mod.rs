//! Trained risk model
//!
//! Owns the fitted label encoders and random forest and enforces the
//! feature order contract between training and inference.

mod config;
mod features;
mod predictor;

pub use config::TrainerConfig;
pub use features::{
    is_categorical, FeatureOrder, FieldValue, PredictionRequest, CATEGORICAL_FEATURES, FEATURE_ORDER,
};
pub use predictor::{FeatureImportance, HeartDiseasePredictor, ModelSummary, PredictionResult};
