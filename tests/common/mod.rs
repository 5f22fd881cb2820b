//! Shared fixtures: a small synthetic survey covering every age bucket

#![allow(dead_code)]

use std::io::Write;

use safeheart::dataset::{CvdDataset, CvdRecord, AGE_ORDER};
use safeheart::model::{HeartDiseasePredictor, PredictionRequest, TrainerConfig};
use tempfile::NamedTempFile;

const BMIS: [f64; 3] = [22.0, 28.5, 34.0];

/// 13 ages x 2 sexes x 2 diabetes x 2 arthritis x 3 BMI levels
pub fn records() -> Vec<CvdRecord> {
    let mut out = Vec::new();
    for (age_idx, age) in AGE_ORDER.iter().enumerate() {
        for sex in ["Male", "Female"] {
            for diabetes in ["No", "Yes"] {
                for arthritis in ["No", "Yes"] {
                    for (bmi_idx, bmi) in BMIS.iter().enumerate() {
                        let height = if sex == "Male" { 178.0 } else { 164.0 } + bmi_idx as f64;
                        let weight = bmi * (height / 100.0) * (height / 100.0);
                        let score = age_idx
                            + 3 * (diabetes == "Yes") as usize
                            + 2 * (arthritis == "Yes") as usize
                            + bmi_idx;
                        let row = out.len();
                        let label = (score >= 12 || row % 17 == 0) as u8;
                        out.push(CvdRecord {
                            sex: sex.to_string(),
                            age_category: age.to_string(),
                            height,
                            weight: (weight * 100.0).round() / 100.0,
                            bmi: *bmi,
                            diabetes: diabetes.to_string(),
                            arthritis: arthritis.to_string(),
                            heart_disease: label,
                        });
                    }
                }
            }
        }
    }
    out
}

pub fn dataset() -> CvdDataset {
    CvdDataset::new(records())
}

/// Survey CSV laid out like the public export: extra columns and
/// Diabetes/Arthritis stored as 0/1
pub fn csv_text(records: &[CvdRecord]) -> String {
    let mut text = String::from(
        "General_Health,Sex,Age_Category,Height,Weight,BMI,Diabetes,Arthritis,Smoking_History,Heart_Disease\n",
    );
    for r in records {
        text.push_str(&format!(
            "Good,{},{},{},{},{},{},{},No,{}\n",
            r.sex,
            r.age_category,
            r.height,
            r.weight,
            r.bmi,
            (r.diabetes == "Yes") as u8,
            (r.arthritis == "Yes") as u8,
            r.heart_disease
        ));
    }
    text
}

pub fn write_csv(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn trainer(trees: usize) -> TrainerConfig {
    TrainerConfig::default().with_n_estimators(trees)
}

pub fn predictor(trees: usize) -> HeartDiseasePredictor {
    HeartDiseasePredictor::train(&dataset(), &trainer(trees)).unwrap()
}

pub fn male_50_54() -> PredictionRequest {
    PredictionRequest::new("Male", "50-54", 175.0, 80.0, 26.1, "No", "No")
}
