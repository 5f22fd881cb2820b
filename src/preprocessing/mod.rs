//! Data preprocessing module
//!
//! Categorical encoding and the train/test split used before fitting.

mod encoder;
mod split;

pub use encoder::{CategoricalEncoders, LabelEncoder};
pub use split::{train_test_split, TrainTestSplit};
