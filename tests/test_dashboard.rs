//! Integration test: dashboard submissions and rendered figures

mod common;

use std::sync::Arc;

use safeheart::dashboard::{DashboardController, HIGH_RISK_TEXT, LOW_RISK_TEXT};
use safeheart::figures::{Figure, HEART_DISEASE, NO_HEART_DISEASE};
use safeheart::model::PredictionRequest;
use safeheart::SafeHeartError;

fn controller() -> DashboardController {
    let dataset = common::dataset();
    let predictor = safeheart::model::HeartDiseasePredictor::train(&dataset, &common::trainer(30)).unwrap();
    DashboardController::new(Arc::new(dataset), Arc::new(predictor))
}

fn female_request() -> PredictionRequest {
    PredictionRequest::new("Female", "65-69", 164.0, 75.0, 27.9, "Yes", "No")
}

#[test]
fn test_initial_render_hides_everything() {
    let view = controller().render_initial();
    assert!(view.risk_text.is_empty());
    assert!(view.probability_text.is_empty());
    assert!(!view.overall_visible);
    assert!(!view.sex_visible);
    assert!(view.overall_figure.is_none());
    assert!(view.sex_figure.is_none());
}

#[test]
fn test_zero_clicks_is_a_no_op() {
    let c = controller();
    // Even an invalid form is ignored before the first click
    let invalid = PredictionRequest::new("Male", "99-104", 175.0, 80.0, 26.1, "No", "No");
    let view = c.submit(0, &invalid).unwrap();
    assert!(view.risk_text.is_empty());
    assert!(!view.overall_visible);
}

#[test]
fn test_submit_reveals_both_charts() {
    let c = controller();
    let form = common::male_50_54();
    let view = c.submit(1, &form).unwrap();

    assert!(view.overall_visible);
    assert!(view.sex_visible);
    let prediction = view.prediction.unwrap();
    let expected_text = if prediction.prediction == 1 { HIGH_RISK_TEXT } else { LOW_RISK_TEXT };
    assert_eq!(view.risk_text, expected_text);
    assert_eq!(
        view.probability_text,
        format!("Predicted Probability: {:.2}%", prediction.probability * 100.0)
    );
    assert_eq!(prediction, c.predictor().predict(&form).unwrap());
}

#[test]
fn test_overall_plot_shows_every_record() {
    let c = controller();
    let view = c.submit(3, &common::male_50_54()).unwrap();
    let fig = view.overall_figure.unwrap();

    // every record plus one "You" marker
    assert_eq!(fig.point_count(), c.dataset().len() + 1);
    let positives = fig.trace(HEART_DISEASE).unwrap().x.as_ref().unwrap().len();
    let negatives = fig.trace(NO_HEART_DISEASE).unwrap().x.as_ref().unwrap().len();
    assert_eq!(positives, c.dataset().positives());
    assert_eq!(positives + negatives, c.dataset().len());

    let you = fig.trace("You").unwrap();
    assert_eq!(you.x.as_ref().unwrap().numbers(), Some(&[26.1][..]));
    assert_eq!(you.y.as_ref().unwrap().labels().unwrap(), &["50-54".to_string()]);
}

#[test]
fn test_female_plot_contains_only_female_records() {
    let c = controller();
    let view = c.submit(1, &female_request()).unwrap();
    let fig: Figure = view.sex_figure.unwrap();

    assert_eq!(fig.layout.title.as_ref().unwrap().text, "BMI vs Age (Sex: Female)");

    let female = c.dataset().filter_by_sex("Female").count();
    let plotted: usize = [HEART_DISEASE, NO_HEART_DISEASE]
        .iter()
        .map(|label| fig.trace(label).unwrap().x.as_ref().unwrap().len())
        .sum();
    assert_eq!(plotted, female);

    // every plotted point matches some Female record
    let female_points: Vec<(f64, String)> = c
        .dataset()
        .filter_by_sex("Female")
        .map(|r| (r.bmi, r.age_category.clone()))
        .collect();
    for label in [HEART_DISEASE, NO_HEART_DISEASE] {
        let trace = fig.trace(label).unwrap();
        let xs = trace.x.as_ref().unwrap().numbers().unwrap();
        let ys = trace.y.as_ref().unwrap().labels().unwrap();
        for (x, y) in xs.iter().zip(ys) {
            assert!(female_points.iter().any(|(b, a)| b == x && a == y));
        }
    }
}

#[test]
fn test_sex_plot_colors() {
    let c = controller();
    let fig = c.submit(1, &common::male_50_54()).unwrap().sex_figure.unwrap();
    let red = fig.trace(HEART_DISEASE).unwrap().marker.as_ref().unwrap().color.clone();
    let blue = fig.trace(NO_HEART_DISEASE).unwrap().marker.as_ref().unwrap().color.clone();
    assert_eq!(red.as_deref(), Some("red"));
    assert_eq!(blue.as_deref(), Some("blue"));
}

#[test]
fn test_failed_prediction_fails_the_view() {
    let c = controller();
    let form = PredictionRequest::new("Male", "99-104", 175.0, 80.0, 26.1, "No", "No");
    let err = c.submit(1, &form).unwrap_err();
    assert!(matches!(err, SafeHeartError::UnrecognizedCategory { .. }));
}

#[test]
fn test_options_list_sorted_ages() {
    let options = controller().options();
    assert_eq!(options.sex, vec!["Male", "Female"]);
    assert_eq!(options.diabetes, vec!["Yes", "No"]);
    assert_eq!(options.age_category.len(), 13);
    let mut sorted = options.age_category.clone();
    sorted.sort();
    assert_eq!(sorted, options.age_category);
}
