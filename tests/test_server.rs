//! Integration test: Server API endpoints

mod common;

use safeheart::model::TrainerConfig;
use safeheart::server::{AppState, ServerConfig, create_router};
use std::path::PathBuf;
use std::sync::Arc;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_path: PathBuf::from("unused.csv"),
        cors_origin: None,
        trainer: TrainerConfig::default().with_n_estimators(20),
    }
}

fn test_app() -> axum::Router {
    let config = test_config();
    let state = AppState::train(config.clone(), common::dataset()).unwrap();
    create_router(Arc::new(state), &config)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn male_form() -> Value {
    json!({
        "Sex": "Male",
        "Age_Category": "50-54",
        "Height": 175,
        "Weight": 80,
        "BMI": 26.1,
        "Diabetes": "No",
        "Arthritis": "No"
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], common::records().len());
    assert_eq!(body["trees"], 20);
    assert_eq!(body["trainer"]["n_estimators"], 20);
    assert_eq!(body["trainer"]["random_state"], 42);
}

#[tokio::test]
async fn test_root_serves_html() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<title>SafeHeart</title>"));
    assert!(html.contains("Predict Risk"));
    assert!(html.contains("plotly"));
}

#[tokio::test]
async fn test_initial_dashboard_is_hidden() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["risk_text"], "");
    assert_eq!(body["overall_visible"], false);
    assert_eq!(body["sex_visible"], false);
    assert!(body.get("overall_figure").is_none());
}

#[tokio::test]
async fn test_options_endpoint() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/options")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sex"], json!(["Male", "Female"]));
    assert_eq!(body["age_category"].as_array().unwrap().len(), 13);
    assert_eq!(body["arthritis"], json!(["Yes", "No"]));
}

#[tokio::test]
async fn test_predict_endpoint() {
    let app = test_app();
    let response = app.oneshot(post_json("/api/predict", male_form())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let prediction = body["prediction"].as_u64().unwrap();
    let probability = body["probability"].as_f64().unwrap();
    assert!(prediction <= 1);
    assert!((0.0..=1.0).contains(&probability));
    assert_eq!(prediction == 1, probability > 0.5);
}

#[tokio::test]
async fn test_predict_rejects_unknown_age() {
    let app = test_app();
    let mut form = male_form();
    form["Age_Category"] = json!("99-104");

    let response = app.oneshot(post_json("/api/predict", form)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Age_Category"));
    assert!(message.contains("99-104"));
}

#[tokio::test]
async fn test_predict_rejects_non_numeric_bmi() {
    let app = test_app();
    let mut form = male_form();
    form["BMI"] = json!("not a number");

    let response = app.oneshot(post_json("/api/predict", form)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("BMI"));
}

#[tokio::test]
async fn test_predict_rejects_malformed_json() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_submit_zero_clicks_returns_initial_view() {
    let app = test_app();
    let response = app
        .oneshot(post_json("/api/dashboard/submit", json!({"n_clicks": 0, "form": male_form()})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["risk_text"], "");
    assert_eq!(body["overall_visible"], false);
}

#[tokio::test]
async fn test_submit_renders_prediction_and_figures() {
    let app = test_app();
    let response = app
        .oneshot(post_json("/api/dashboard/submit", json!({"n_clicks": 1, "form": male_form()})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["overall_visible"], true);
    assert_eq!(body["sex_visible"], true);

    let risk = body["risk_text"].as_str().unwrap();
    if body["prediction"]["prediction"] == 1 {
        assert_eq!(risk, "🫀 High Risk of Heart Disease");
    } else {
        assert_eq!(risk, "💚 Low Risk of Heart Disease");
    }
    assert!(body["probability_text"].as_str().unwrap().starts_with("Predicted Probability: "));

    let overall = &body["overall_figure"];
    assert_eq!(overall["layout"]["width"], 1000);
    assert_eq!(overall["layout"]["height"], 800);
    let sex = &body["sex_figure"];
    assert_eq!(sex["layout"]["title"]["text"], "BMI vs Age (Sex: Male)");
    let you = sex["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "You")
        .unwrap();
    assert_eq!(you["marker"]["symbol"], "star");
    assert_eq!(you["marker"]["color"], "gold");
}

#[tokio::test]
async fn test_submit_error_is_structured() {
    let app = test_app();
    let mut form = male_form();
    form["Sex"] = json!("Unknown");
    let response = app
        .oneshot(post_json("/api/dashboard/submit", json!({"n_clicks": 2, "form": form})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("Sex"));
}

#[tokio::test]
async fn test_charts_endpoint() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/charts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let charts = body["charts"].as_array().unwrap();
    assert_eq!(charts.len(), 5);
    let titles: Vec<&str> = charts.iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert_eq!(
        titles,
        vec![
            "Heart Disease Counts by Sex",
            "BMI Distribution",
            "Age Category Distribution",
            "BMI vs Age Category colored by Diabetes",
            "BMI vs Age Category colored by Arthritis",
        ]
    );
}

#[tokio::test]
async fn test_single_chart_and_unknown_chart() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/charts/bmi-distribution")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["figure"]["data"][0]["y"].as_array().unwrap().len(), 40);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/charts/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_model_summary_endpoint() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["n_trees"], 20);
    assert_eq!(
        body["feature_order"],
        json!(["Sex", "Age_Category", "Height", "Weight", "BMI", "Diabetes", "Arthritis"])
    );
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nothing-here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_wrong_method_returns_405() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
