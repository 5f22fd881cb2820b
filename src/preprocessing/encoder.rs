//! Label encoding for categorical columns

use crate::error::{Result, SafeHeartError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bijection between a column's observed values and `0..k`.
///
/// Classes are kept sorted, so the code of a value is its rank among the
/// distinct values seen during fit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            classes: Vec::new(),
            mapping: HashMap::new(),
        }
    }

    /// Learn the vocabulary from the column values
    pub fn fit<S: AsRef<str>>(&mut self, values: &[S]) -> Result<&mut Self> {
        if values.is_empty() {
            return Err(SafeHeartError::TrainingError(format!(
                "cannot fit encoder for '{}' on an empty column",
                self.column
            )));
        }

        let mut classes: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();

        self.mapping = classes
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.clone(), idx))
            .collect();
        self.classes = classes;
        Ok(self)
    }

    /// Fit and encode in one step
    pub fn fit_transform<S: AsRef<str>>(&mut self, values: &[S]) -> Result<Vec<usize>> {
        self.fit(values)?;
        values.iter().map(|v| self.transform(v.as_ref())).collect()
    }

    /// Encode a single value; unseen values are rejected
    pub fn transform(&self, value: &str) -> Result<usize> {
        if !self.is_fitted() {
            return Err(SafeHeartError::ModelNotFitted);
        }
        self.mapping
            .get(value)
            .copied()
            .ok_or_else(|| SafeHeartError::UnrecognizedCategory {
                field: self.column.clone(),
                value: value.to_string(),
                expected: self.classes.clone(),
            })
    }

    /// Decode a code back to its value
    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }
}

/// One fitted [`LabelEncoder`] per categorical column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoricalEncoders {
    encoders: HashMap<String, LabelEncoder>,
}

impl CategoricalEncoders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit an encoder for `column` and return the encoded values
    pub fn fit_column<S: AsRef<str>>(&mut self, column: &str, values: &[S]) -> Result<Vec<usize>> {
        let mut encoder = LabelEncoder::new(column);
        let codes = encoder.fit_transform(values)?;
        self.encoders.insert(column.to_string(), encoder);
        Ok(codes)
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    /// Encode a value for a column, failing on unknown columns or values
    pub fn encode(&self, column: &str, value: &str) -> Result<usize> {
        self.encoders
            .get(column)
            .ok_or(SafeHeartError::ModelNotFitted)?
            .transform(value)
    }

    /// Vocabulary per column, sorted by column name
    pub fn vocabularies(&self) -> Vec<(String, Vec<String>)> {
        let mut out: Vec<(String, Vec<String>)> = self
            .encoders
            .iter()
            .map(|(k, e)| (k.clone(), e.classes().to_vec()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
