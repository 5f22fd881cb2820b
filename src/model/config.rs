//! Trainer configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters for fitting the risk classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Number of trees in the forest
    pub n_estimators: usize,
    /// Fraction of rows held out before fitting
    pub test_size: f64,
    /// Seed for the split and for every tree
    pub random_state: u64,
    /// Maximum tree depth, unlimited when `None`
    pub max_depth: Option<usize>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            test_size: 0.2,
            random_state: 42,
            max_depth: None,
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}
