//! Dashboard controller
//!
//! Turns a form submission into everything the prediction tab shows: the
//! risk text, the probability line and two scatter plots carrying the
//! user's point. The view is built whole or not at all.

use crate::dataset::{CvdDataset, AGE_CATEGORY, BMI, SEX, SEX_OPTIONS, YES_NO_OPTIONS};
use crate::error::Result;
use crate::figures::{overall_scatter, sex_scatter, Figure, UserPoint};
use crate::model::{HeartDiseasePredictor, PredictionRequest, PredictionResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub const HIGH_RISK_TEXT: &str = "🫀 High Risk of Heart Disease";
pub const LOW_RISK_TEXT: &str = "💚 Low Risk of Heart Disease";

pub fn risk_text(result: &PredictionResult) -> &'static str {
    if result.is_high_risk() {
        HIGH_RISK_TEXT
    } else {
        LOW_RISK_TEXT
    }
}

pub fn probability_text(probability: f64) -> String {
    format!("Predicted Probability: {:.2}%", probability * 100.0)
}

/// A click of the predict button together with the form state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub n_clicks: u64,
    #[serde(default)]
    pub form: PredictionRequest,
}

/// Everything the prediction tab renders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardView {
    pub risk_text: String,
    pub probability_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_figure: Option<Figure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex_figure: Option<Figure>,
    pub overall_visible: bool,
    pub sex_visible: bool,
}

impl DashboardView {
    /// Nothing predicted yet: empty text, both chart containers hidden
    pub fn initial() -> Self {
        Self::default()
    }
}

/// Dropdown domains of the prediction form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormOptions {
    pub sex: Vec<String>,
    pub age_category: Vec<String>,
    pub diabetes: Vec<String>,
    pub arthritis: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardController {
    dataset: Arc<CvdDataset>,
    predictor: Arc<HeartDiseasePredictor>,
}

impl DashboardController {
    pub fn new(dataset: Arc<CvdDataset>, predictor: Arc<HeartDiseasePredictor>) -> Self {
        Self { dataset, predictor }
    }

    pub fn dataset(&self) -> &CvdDataset {
        &self.dataset
    }

    pub fn predictor(&self) -> &HeartDiseasePredictor {
        &self.predictor
    }

    pub fn render_initial(&self) -> DashboardView {
        DashboardView::initial()
    }

    /// Handle a predict click. `n_clicks == 0` is the page-load call and
    /// leaves the initial view untouched.
    pub fn submit(&self, n_clicks: u64, form: &PredictionRequest) -> Result<DashboardView> {
        if n_clicks == 0 {
            return Ok(self.render_initial());
        }

        let start = Instant::now();
        let result = self.predictor.predict(form)?;
        debug!(
            prediction = result.prediction,
            probability = result.probability,
            "Prediction ready, rendering figures"
        );

        let user = UserPoint::new(form.number(BMI)?, form.category(AGE_CATEGORY));
        let sex = form.category(SEX);
        let overall_figure = overall_scatter(&self.dataset, &user);
        let sex_figure = sex_scatter(&self.dataset, &sex, &user);

        debug!(
            n_clicks,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dashboard rendered"
        );

        Ok(DashboardView {
            risk_text: risk_text(&result).to_string(),
            probability_text: probability_text(result.probability),
            prediction: Some(result),
            overall_figure: Some(overall_figure),
            sex_figure: Some(sex_figure),
            overall_visible: true,
            sex_visible: true,
        })
    }

    pub fn options(&self) -> FormOptions {
        let yes_no: Vec<String> = YES_NO_OPTIONS.iter().map(|s| s.to_string()).collect();
        FormOptions {
            sex: SEX_OPTIONS.iter().map(|s| s.to_string()).collect(),
            age_category: self
                .predictor
                .vocabulary(AGE_CATEGORY)
                .map(|v| v.to_vec())
                .unwrap_or_else(|| self.dataset.age_categories()),
            diabetes: yes_no.clone(),
            arthritis: yes_no,
        }
    }
}
