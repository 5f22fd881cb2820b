//! Cardiovascular survey dataset
//!
//! Loads the CSV once at startup and converts the required columns into
//! typed [`CvdRecord`]s. Everything downstream (encoders, forest, figures)
//! reads from the same immutable [`CvdDataset`].

mod loader;

pub use loader::DataLoader;

use crate::error::{Result, SafeHeartError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const SEX: &str = "Sex";
pub const AGE_CATEGORY: &str = "Age_Category";
pub const HEIGHT: &str = "Height";
pub const WEIGHT: &str = "Weight";
pub const BMI: &str = "BMI";
pub const DIABETES: &str = "Diabetes";
pub const ARTHRITIS: &str = "Arthritis";
pub const HEART_DISEASE: &str = "Heart_Disease";

/// Columns the dataset file must provide; anything else is ignored
pub const REQUIRED_COLUMNS: [&str; 8] = [
    SEX,
    AGE_CATEGORY,
    HEIGHT,
    WEIGHT,
    BMI,
    DIABETES,
    ARTHRITIS,
    HEART_DISEASE,
];

/// Fixed ordering of the survey's age buckets
pub const AGE_ORDER: [&str; 13] = [
    "18-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54", "55-59", "60-64", "65-69",
    "70-74", "75-79", "80+",
];

pub const SEX_OPTIONS: [&str; 2] = ["Male", "Female"];
pub const YES_NO_OPTIONS: [&str; 2] = ["Yes", "No"];

/// One row of the survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvdRecord {
    pub sex: String,
    pub age_category: String,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub diabetes: String,
    pub arthritis: String,
    pub heart_disease: u8,
}

impl CvdRecord {
    pub fn has_heart_disease(&self) -> bool {
        self.heart_disease == 1
    }
}

/// The loaded survey, immutable after construction
#[derive(Debug, Clone, Default)]
pub struct CvdDataset {
    records: Vec<CvdRecord>,
}

impl CvdDataset {
    pub fn new(records: Vec<CvdRecord>) -> Self {
        Self { records }
    }

    /// Convert the required columns of a loaded frame into records.
    ///
    /// Diabetes and Arthritis may be stored as 0/1; those are mapped to
    /// "No"/"Yes" before being treated as categories. Heart_Disease accepts
    /// 0/1 or "No"/"Yes".
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(SafeHeartError::MissingColumn(name.to_string()));
            }
        }

        let sex = string_column(df, SEX)?;
        let age = string_column(df, AGE_CATEGORY)?;
        let height = numeric_column(df, HEIGHT)?;
        let weight = numeric_column(df, WEIGHT)?;
        let bmi = numeric_column(df, BMI)?;
        let diabetes = yes_no_column(df, DIABETES)?;
        let arthritis = yes_no_column(df, ARTHRITIS)?;
        let label = label_column(df, HEART_DISEASE)?;

        let records = (0..df.height())
            .map(|i| CvdRecord {
                sex: sex[i].clone(),
                age_category: age[i].clone(),
                height: height[i],
                weight: weight[i],
                bmi: bmi[i],
                diabetes: diabetes[i].clone(),
                arthritis: arthritis[i].clone(),
                heart_disease: label[i],
            })
            .collect();

        Ok(Self { records })
    }

    pub fn records(&self) -> &[CvdRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose sex matches exactly
    pub fn filter_by_sex<'a>(&'a self, sex: &'a str) -> impl Iterator<Item = &'a CvdRecord> + 'a {
        self.records.iter().filter(move |r| r.sex == sex)
    }

    /// Sorted distinct age categories present in the data
    pub fn age_categories(&self) -> Vec<String> {
        let mut values: Vec<String> = self.records.iter().map(|r| r.age_category.clone()).collect();
        values.sort();
        values.dedup();
        values
    }

    /// Number of positive labels
    pub fn positives(&self) -> usize {
        self.records.iter().filter(|r| r.has_heart_disease()).count()
    }
}

fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| SafeHeartError::MissingColumn(name.to_string()))
}

fn null_error(name: &str, row: usize) -> SafeHeartError {
    SafeHeartError::DataError(format!("column '{}' has a missing value at row {}", name, row))
}

fn non_finite_error(name: &str, row: usize) -> SafeHeartError {
    SafeHeartError::DataError(format!("column '{}' has a non-finite value at row {}", name, row))
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let s = series(df, name)?.cast(&DataType::String)?;
    let ca = s.str()?;
    ca.into_iter()
        .enumerate()
        .map(|(i, v)| v.map(str::to_string).ok_or_else(|| null_error(name, i)))
        .collect()
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let s = series(df, name)?;
    let is_text = matches!(s.dtype(), DataType::String);
    let cast = s.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    ca.into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(x) if !x.is_finite() => Err(non_finite_error(name, i)),
            Some(x) => Ok(x),
            None if is_text => Err(SafeHeartError::DataError(format!(
                "column '{}' has a non-numeric value at row {}",
                name, i
            ))),
            None => Err(null_error(name, i)),
        })
        .collect()
}

fn yes_no_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let s = series(df, name)?;
    if matches!(s.dtype(), DataType::String) {
        return string_column(df, name);
    }

    let cast = s.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    ca.into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(x) if x == 1.0 => Ok("Yes".to_string()),
            Some(x) if x == 0.0 => Ok("No".to_string()),
            Some(x) if !x.is_finite() => Err(non_finite_error(name, i)),
            Some(x) => Ok(x.to_string()),
            None => Err(null_error(name, i)),
        })
        .collect()
}

fn label_column(df: &DataFrame, name: &str) -> Result<Vec<u8>> {
    let s = series(df, name)?;
    if matches!(s.dtype(), DataType::String) {
        let ca = s.str()?;
        return ca
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v.map(|t| t.trim().to_ascii_lowercase()) {
                Some(t) if t == "yes" || t == "1" => Ok(1),
                Some(t) if t == "no" || t == "0" => Ok(0),
                Some(t) => Err(SafeHeartError::DataError(format!(
                    "column '{}' has unsupported label '{}' at row {}",
                    name, t, i
                ))),
                None => Err(null_error(name, i)),
            })
            .collect();
    }

    let cast = s.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    ca.into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(x) if x == 1.0 => Ok(1),
            Some(x) if x == 0.0 => Ok(0),
            Some(x) => Err(SafeHeartError::DataError(format!(
                "column '{}' has unsupported label {} at row {}",
                name, x, i
            ))),
            None => Err(null_error(name, i)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "General_Health" => &["Good", "Poor", "Fair"],
            "Sex" => &["Male", "Female", "Female"],
            "Age_Category" => &["50-54", "80+", "18-24"],
            "Height" => &[175.0, 160.0, 165.0],
            "Weight" => &[80.0, 60.5, 55.0],
            "BMI" => &[26.1, 23.6, 20.2],
            "Diabetes" => &[0i64, 1, 0],
            "Arthritis" => &["No", "Yes", "No"],
            "Heart_Disease" => &[0i64, 1, 0]
        )
        .unwrap()
    }

    #[test]
    fn test_from_dataframe_maps_numeric_yes_no() {
        let ds = CvdDataset::from_dataframe(&sample_df()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.records()[0];
        assert_eq!(first.diabetes, "No");
        assert_eq!(first.arthritis, "No");
        assert_eq!(ds.records()[1].diabetes, "Yes");
        assert_eq!(ds.records()[1].heart_disease, 1);
        assert_eq!(ds.positives(), 1);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let df = sample_df().drop("BMI").unwrap();
        let err = CvdDataset::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, SafeHeartError::MissingColumn(ref c) if c == "BMI"));
    }

    #[test]
    fn test_string_labels_are_accepted() {
        let mut df = sample_df();
        df.with_column(Series::new("Heart_Disease".into(), &["No", "Yes", "no"]))
            .unwrap();
        let ds = CvdDataset::from_dataframe(&df).unwrap();
        let labels: Vec<u8> = ds.records().iter().map(|r| r.heart_disease).collect();
        assert_eq!(labels, vec![0, 1, 0]);
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let mut df = sample_df();
        df.with_column(Series::new("Height".into(), &[175.0, f64::INFINITY, 165.0]))
            .unwrap();
        let err = CvdDataset::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, SafeHeartError::DataError(ref m) if m.contains("Height") && m.contains("row 1")));

        let mut df = sample_df();
        df.with_column(Series::new("Diabetes".into(), &[0.0, f64::NAN, 1.0]))
            .unwrap();
        assert!(matches!(
            CvdDataset::from_dataframe(&df),
            Err(SafeHeartError::DataError(_))
        ));
    }

    #[test]
    fn test_filter_by_sex_and_age_categories() {
        let ds = CvdDataset::from_dataframe(&sample_df()).unwrap();
        assert_eq!(ds.filter_by_sex("Female").count(), 2);
        assert!(ds.filter_by_sex("Female").all(|r| r.sex == "Female"));
        assert_eq!(ds.age_categories(), vec!["18-24", "50-54", "80+"]);
    }
}
