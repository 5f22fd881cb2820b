//! Data loading utilities

use crate::error::{Result, SafeHeartError};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use super::{CvdDataset, REQUIRED_COLUMNS};

/// CSV loader for the survey file
pub struct DataLoader {
    /// Rows used for schema inference
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(10_000),
        }
    }

    /// Load a CSV file into a frame
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SafeHeartError::DataError(format!("cannot open dataset {}: {}", path.display(), e))
        })?;

        let reader = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file);

        reader
            .finish()
            .map_err(|e| SafeHeartError::DataError(e.to_string()))
    }

    /// Load the survey file and convert it into typed records
    pub fn load_dataset(&self, path: impl AsRef<Path>) -> Result<CvdDataset> {
        let path = path.as_ref();
        let start = Instant::now();
        let df = self.load_csv(path)?;

        let dataset = CvdDataset::from_dataframe(&df)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = df.width(),
            required = REQUIRED_COLUMNS.len(),
            positives = dataset.positives(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dataset loaded"
        );
        Ok(dataset)
    }
}
