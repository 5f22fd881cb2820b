//! Feature order contract and prediction request

use crate::dataset::{CvdRecord, AGE_CATEGORY, ARTHRITIS, BMI, DIABETES, HEIGHT, SEX, WEIGHT};
use crate::error::{Result, SafeHeartError};
use crate::preprocessing::CategoricalEncoders;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Column order the forest is trained on and expects at inference
pub const FEATURE_ORDER: [&str; 7] = [SEX, AGE_CATEGORY, HEIGHT, WEIGHT, BMI, DIABETES, ARTHRITIS];

/// Columns label-encoded before training
pub const CATEGORICAL_FEATURES: [&str; 4] = [SEX, AGE_CATEGORY, DIABETES, ARTHRITIS];

pub fn is_categorical(name: &str) -> bool {
    CATEGORICAL_FEATURES.contains(&name)
}

/// A loose scalar as submitted by a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// String form used for encoder lookup
    pub fn as_category(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }

    /// Numeric form; text is accepted when it parses as a finite number
    pub fn as_number(&self, field: &str) -> Result<f64> {
        let invalid = |reason: String| SafeHeartError::InvalidNumeric {
            field: field.to_string(),
            reason,
        };
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(invalid("value is empty".to_string()));
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("'{}' is not a number", s)))?
            }
            FieldValue::Flag(b) => return Err(invalid(format!("'{}' is not a number", b))),
        };
        if !value.is_finite() {
            return Err(invalid(format!("{} is not finite", value)));
        }
        Ok(value)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// The seven feature fields of one prediction, keyed by dataset column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Sex", default)]
    pub sex: Option<FieldValue>,
    #[serde(rename = "Age_Category", default)]
    pub age_category: Option<FieldValue>,
    #[serde(rename = "Height", default)]
    pub height: Option<FieldValue>,
    #[serde(rename = "Weight", default)]
    pub weight: Option<FieldValue>,
    #[serde(rename = "BMI", default)]
    pub bmi: Option<FieldValue>,
    #[serde(rename = "Diabetes", default)]
    pub diabetes: Option<FieldValue>,
    #[serde(rename = "Arthritis", default)]
    pub arthritis: Option<FieldValue>,
}

impl PredictionRequest {
    pub fn new(
        sex: &str,
        age_category: &str,
        height: f64,
        weight: f64,
        bmi: f64,
        diabetes: &str,
        arthritis: &str,
    ) -> Self {
        Self {
            sex: Some(sex.into()),
            age_category: Some(age_category.into()),
            height: Some(height.into()),
            weight: Some(weight.into()),
            bmi: Some(bmi.into()),
            diabetes: Some(diabetes.into()),
            arthritis: Some(arthritis.into()),
        }
    }

    /// Look a field up by its column name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        match name {
            SEX => self.sex.as_ref(),
            AGE_CATEGORY => self.age_category.as_ref(),
            HEIGHT => self.height.as_ref(),
            WEIGHT => self.weight.as_ref(),
            BMI => self.bmi.as_ref(),
            DIABETES => self.diabetes.as_ref(),
            ARTHRITIS => self.arthritis.as_ref(),
            _ => None,
        }
    }

    /// Categorical value as a string; a missing field becomes ""
    pub fn category(&self, name: &str) -> String {
        self.field(name).map(FieldValue::as_category).unwrap_or_default()
    }

    /// Numeric value, rejecting missing and malformed input
    pub fn number(&self, name: &str) -> Result<f64> {
        self.field(name)
            .ok_or_else(|| SafeHeartError::InvalidNumeric {
                field: name.to_string(),
                reason: "value is missing".to_string(),
            })?
            .as_number(name)
    }
}

/// Named column sequence recorded at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureOrder {
    names: Vec<String>,
}

impl Default for FeatureOrder {
    fn default() -> Self {
        Self {
            names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FeatureOrder {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Fail unless this order is exactly [`FEATURE_ORDER`]
    pub fn check(&self) -> Result<()> {
        if self.names.len() != FEATURE_ORDER.len()
            || self.names.iter().zip(FEATURE_ORDER).any(|(a, b)| a != b)
        {
            return Err(SafeHeartError::FeatureOrder(format!(
                "expected {:?}, model was trained on {:?}",
                FEATURE_ORDER, self.names
            )));
        }
        Ok(())
    }

    /// Encode a training record in order
    pub fn record_row(&self, record: &CvdRecord, encoders: &CategoricalEncoders) -> Result<Vec<f64>> {
        self.names
            .iter()
            .map(|name| match name.as_str() {
                SEX => encode(encoders, SEX, &record.sex),
                AGE_CATEGORY => encode(encoders, AGE_CATEGORY, &record.age_category),
                DIABETES => encode(encoders, DIABETES, &record.diabetes),
                ARTHRITIS => encode(encoders, ARTHRITIS, &record.arthritis),
                HEIGHT => Ok(record.height),
                WEIGHT => Ok(record.weight),
                BMI => Ok(record.bmi),
                other => Err(SafeHeartError::FeatureOrder(format!("unknown feature '{}'", other))),
            })
            .collect()
    }

    /// Encode a request in order; categorical fields are validated first so
    /// an unknown category is reported before a numeric problem
    pub fn request_row(&self, request: &PredictionRequest, encoders: &CategoricalEncoders) -> Result<Array1<f64>> {
        for name in self.names.iter().filter(|n| is_categorical(n)) {
            encode(encoders, name, &request.category(name))?;
        }

        let row = self
            .names
            .iter()
            .map(|name| {
                if is_categorical(name) {
                    encode(encoders, name, &request.category(name))
                } else {
                    request.number(name)
                }
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(Array1::from_vec(row))
    }
}

fn encode(encoders: &CategoricalEncoders, column: &str, value: &str) -> Result<f64> {
    encoders.encode(column, value).map(|code| code as f64)
}
