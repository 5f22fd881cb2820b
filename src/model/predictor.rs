//! Heart disease risk predictor

use super::config::TrainerConfig;
use super::features::{FeatureOrder, PredictionRequest, CATEGORICAL_FEATURES};
use crate::dataset::{CvdDataset, CvdRecord, AGE_CATEGORY, ARTHRITIS, DIABETES, SEX};
use crate::error::{Result, SafeHeartError};
use crate::preprocessing::{train_test_split, CategoricalEncoders};
use crate::training::RandomForest;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 1 when the positive class wins the vote
    pub prediction: u8,
    /// Probability of heart disease, rounded to 4 decimals
    pub probability: f64,
}

impl PredictionResult {
    pub fn is_high_risk(&self) -> bool {
        self.prediction == 1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Read-only description of the fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_type: String,
    pub n_trees: usize,
    pub feature_order: Vec<String>,
    pub vocabularies: BTreeMap<String, Vec<String>>,
    pub feature_importances: Vec<FeatureImportance>,
    pub n_train: usize,
    pub n_test: usize,
    pub config: TrainerConfig,
}

/// Label encoders plus forest, fitted once and shared read-only
#[derive(Debug, Clone)]
pub struct HeartDiseasePredictor {
    encoders: CategoricalEncoders,
    forest: RandomForest,
    feature_order: FeatureOrder,
    n_train: usize,
    n_test: usize,
    config: TrainerConfig,
}

impl HeartDiseasePredictor {
    /// Fit encoders and forest on the whole dataset
    pub fn train(dataset: &CvdDataset, config: &TrainerConfig) -> Result<Self> {
        let start = Instant::now();
        if dataset.is_empty() {
            return Err(SafeHeartError::DataError("dataset has no rows".to_string()));
        }
        let records = dataset.records();

        let mut encoders = CategoricalEncoders::new();
        for column in CATEGORICAL_FEATURES {
            let values: Vec<&str> = records.iter().map(|r| categorical_value(r, column)).collect();
            encoders.fit_column(column, &values)?;
        }

        let feature_order = FeatureOrder::default();
        let mut x = Array2::<f64>::zeros((records.len(), feature_order.len()));
        for (i, record) in records.iter().enumerate() {
            let row = feature_order.record_row(record, &encoders)?;
            x.row_mut(i).assign(&Array1::from_vec(row));
        }
        let y: Array1<f64> = records.iter().map(|r| r.heart_disease as f64).collect();

        let split = train_test_split(&x, &y, config.test_size, config.random_state)?;
        debug!(
            train = split.x_train.nrows(),
            test = split.x_test.nrows(),
            "Split dataset"
        );

        let mut forest = RandomForest::new(config.n_estimators).with_random_state(config.random_state);
        if let Some(depth) = config.max_depth {
            forest = forest.with_max_depth(depth);
        }
        forest.fit(&split.x_train, &split.y_train)?;

        info!(
            rows = records.len(),
            train = split.x_train.nrows(),
            trees = forest.n_trees(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Trained heart disease classifier"
        );

        Ok(Self {
            encoders,
            forest,
            feature_order,
            n_train: split.x_train.nrows(),
            n_test: split.x_test.nrows(),
            config: config.clone(),
        })
    }

    /// Score one request
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let row = self.encode(request)?;
        let (class, proba) = self.forest.predict_row(row.view())?;

        let positive = self
            .forest
            .classes()
            .iter()
            .position(|&c| c == 1.0)
            .map(|idx| proba[idx])
            .unwrap_or(0.0);

        Ok(PredictionResult {
            prediction: if class == 1.0 { 1 } else { 0 },
            probability: round4(positive),
        })
    }

    /// Encode a request into a model row, enforcing the feature order
    pub fn encode(&self, request: &PredictionRequest) -> Result<Array1<f64>> {
        self.feature_order.check()?;
        let row = self.feature_order.request_row(request, &self.encoders)?;
        if row.len() != self.forest.n_features() {
            return Err(SafeHeartError::FeatureOrder(format!(
                "row has {} features, model expects {}",
                row.len(),
                self.forest.n_features()
            )));
        }
        Ok(row)
    }

    /// Sorted vocabulary of a categorical field
    pub fn vocabulary(&self, field: &str) -> Option<&[String]> {
        self.encoders.get(field).map(|e| e.classes())
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    pub fn feature_order(&self) -> &FeatureOrder {
        &self.feature_order
    }

    pub fn summary(&self) -> ModelSummary {
        let feature_importances = self
            .forest
            .feature_importances()
            .map(|imp| {
                self.feature_order
                    .names()
                    .iter()
                    .zip(imp.iter())
                    .map(|(name, &value)| FeatureImportance {
                        feature: name.clone(),
                        importance: round4(value),
                    })
                    .collect()
            })
            .unwrap_or_default();

        ModelSummary {
            model_type: "RandomForestClassifier".to_string(),
            n_trees: self.forest.n_trees(),
            feature_order: self.feature_order.names().to_vec(),
            vocabularies: self.encoders.vocabularies().into_iter().collect(),
            feature_importances,
            n_train: self.n_train,
            n_test: self.n_test,
            config: self.config.clone(),
        }
    }
}

fn categorical_value<'a>(record: &'a CvdRecord, column: &str) -> &'a str {
    match column {
        SEX => &record.sex,
        AGE_CATEGORY => &record.age_category,
        DIABETES => &record.diabetes,
        ARTHRITIS => &record.arthritis,
        _ => "",
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AGE_ORDER, CvdRecord};
    use crate::model::FieldValue;

    fn record(sex: &str, age: &str, bmi: f64, diabetes: &str, label: u8) -> CvdRecord {
        CvdRecord {
            sex: sex.to_string(),
            age_category: age.to_string(),
            height: 170.0,
            weight: bmi * 2.89,
            bmi,
            diabetes: diabetes.to_string(),
            arthritis: "No".to_string(),
            heart_disease: label,
        }
    }

    fn dataset() -> CvdDataset {
        let mut records = Vec::new();
        for (i, age) in AGE_ORDER.iter().enumerate() {
            for k in 0..6 {
                let sex = if k % 2 == 0 { "Male" } else { "Female" };
                let older = i >= 8;
                let bmi = 20.0 + i as f64 + k as f64;
                records.push(record(sex, age, bmi, if older { "Yes" } else { "No" }, older as u8));
            }
        }
        CvdDataset::new(records)
    }

    fn small_config() -> TrainerConfig {
        TrainerConfig::default().with_n_estimators(15)
    }

    #[test]
    fn test_train_and_predict() {
        let predictor = HeartDiseasePredictor::train(&dataset(), &small_config()).unwrap();
        let req = PredictionRequest::new("Male", "50-54", 175.0, 80.0, 26.1, "No", "No");
        let result = predictor.predict(&req).unwrap();
        assert!(result.prediction <= 1);
        assert!((0.0..=1.0).contains(&result.probability));
        assert_eq!(result.prediction == 1, result.probability > 0.5);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let predictor = HeartDiseasePredictor::train(&dataset(), &small_config()).unwrap();
        let req = PredictionRequest::new("Female", "75-79", 160.0, 70.0, 31.0, "Yes", "No");
        assert_eq!(predictor.predict(&req).unwrap(), predictor.predict(&req).unwrap());
    }

    #[test]
    fn test_same_seed_same_model() {
        let a = HeartDiseasePredictor::train(&dataset(), &small_config()).unwrap();
        let b = HeartDiseasePredictor::train(&dataset(), &small_config()).unwrap();
        for age in AGE_ORDER {
            let req = PredictionRequest::new("Male", age, 175.0, 80.0, 27.0, "No", "No");
            assert_eq!(a.predict(&req).unwrap(), b.predict(&req).unwrap());
        }
    }

    #[test]
    fn test_unseen_category_is_rejected() {
        let predictor = HeartDiseasePredictor::train(&dataset(), &small_config()).unwrap();
        let req = PredictionRequest::new("Male", "99-104", 175.0, 80.0, 26.1, "No", "No");
        match predictor.predict(&req) {
            Err(SafeHeartError::UnrecognizedCategory { field, value, expected }) => {
                assert_eq!(field, "Age_Category");
                assert_eq!(value, "99-104");
                assert_eq!(expected.len(), 13);
            }
            other => panic!("expected UnrecognizedCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_bmi_is_rejected() {
        let predictor = HeartDiseasePredictor::train(&dataset(), &small_config()).unwrap();
        let mut req = PredictionRequest::new("Male", "50-54", 175.0, 80.0, 26.1, "No", "No");
        req.bmi = Some(FieldValue::Text("n/a".to_string()));
        let err = predictor.predict(&req).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("BMI"));
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let predictor = HeartDiseasePredictor::train(&dataset(), &small_config()).unwrap();
        assert_eq!(predictor.vocabulary("Sex").unwrap(), &["Female", "Male"]);
        let ages = predictor.vocabulary("Age_Category").unwrap();
        assert_eq!(ages.first().map(String::as_str), Some("18-24"));
        assert_eq!(ages.last().map(String::as_str), Some("80+"));
        assert!(predictor.vocabulary("BMI").is_none());
    }

    #[test]
    fn test_summary() {
        let data = dataset();
        let predictor = HeartDiseasePredictor::train(&data, &small_config()).unwrap();
        let summary = predictor.summary();
        assert_eq!(summary.n_trees, 15);
        assert_eq!(summary.feature_order.len(), 7);
        assert_eq!(summary.n_train + summary.n_test, data.len());
        assert_eq!(summary.vocabularies.len(), 4);
        assert_eq!(summary.feature_importances.len(), 7);
        let total: f64 = summary.feature_importances.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_empty_dataset_fails() {
        let result = HeartDiseasePredictor::train(&CvdDataset::default(), &small_config());
        assert!(matches!(result, Err(SafeHeartError::DataError(_))));
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }
}
