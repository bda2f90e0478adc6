//! Router tests - handlers end to end over an in-memory service

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use screening_core::logic::features::FeatureVector;
use screening_core::{ArtifactSettings, ClassTable, Classifier, InferenceError, ModelArtifact, ModelService};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::{create_router, AppState};

struct Stub {
    class_id: i64,
    probabilities: Option<Vec<f64>>,
}

impl Classifier for Stub {
    fn kind(&self) -> &'static str {
        "stub"
    }

    fn predict(&self, _: &FeatureVector) -> Result<i64, InferenceError> {
        Ok(self.class_id)
    }

    fn supports_probabilities(&self) -> bool {
        self.probabilities.is_some()
    }

    fn predict_proba(&self, _: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        self.probabilities
            .clone()
            .ok_or_else(|| InferenceError("no probabilities".to_string()))
    }
}

struct Panics;

impl Classifier for Panics {
    fn kind(&self) -> &'static str {
        "panics"
    }

    fn predict(&self, _: &FeatureVector) -> Result<i64, InferenceError> {
        panic!("runtime exploded")
    }
}

fn config_for(dir: &std::path::Path) -> Config {
    Config {
        model_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

fn app_with(config: Config, classifier: Option<Box<dyn Classifier>>) -> Router {
    let settings = ArtifactSettings::new(&config.model_dir).with_config_paths(Vec::new());
    let service = Arc::new(ModelService::new(settings, "1.0.0"));
    if let Some(classifier) = classifier {
        service.install(ModelArtifact::new(classifier), ClassTable::defaults());
    }
    create_router(AppState { service, config })
}

fn app(classifier: Option<Box<dyn Classifier>>) -> Router {
    let dir = std::env::temp_dir().join("screening-api-tests-missing");
    app_with(config_for(&dir), classifier)
}

fn mild() -> Option<Box<dyn Classifier>> {
    Some(Box::new(Stub {
        class_id: 1,
        probabilities: Some(vec![0.1, 0.7, 0.15, 0.05]),
    }))
}

fn answers(value: u8) -> Value {
    let body: serde_json::Map<String, Value> =
        (1..=30).map(|i| (format!("q{}", i), json!(value))).collect();
    Value::Object(body)
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health_reports_degraded_without_model() {
    for uri in ["/", "/health"] {
        let (status, body) = send(app(None), get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "degraded", "model_loaded": false, "version": "1.0.0" }));
    }
}

#[tokio::test]
async fn test_health_reports_healthy_with_model() {
    let (status, body) = send(app(mild()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
}

#[tokio::test]
async fn test_predict() {
    let (status, body) = send(app(mild()), post_json("/predict", answers(2).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "Mild");
    assert_eq!(body["severity_level"], 1);
    assert_eq!(body["confidence"], 0.7);
    assert_eq!(body["probabilities"]["moderate"], 0.15);
    assert!(body["description"].as_str().unwrap().starts_with("Mild indicators"));
    assert!(body["disclaimer"].as_str().unwrap().contains("NOT a medical diagnosis"));
}

#[tokio::test]
async fn test_predict_unloaded_is_503_before_validation() {
    let (status, body) = send(app(None), post_json("/predict", "{\"q1\": 9}".to_string())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);

    let (status, _) = send(app(None), post_json("/predict", "not json".to_string())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_predict_rejects_bad_answers() {
    let mut body = answers(2);
    body["q30"] = json!(5);
    let (status, response) = send(app(mild()), post_json("/predict", body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["status"], 400);
    assert!(response["error"].as_str().unwrap().contains("q30"));

    let mut short = answers(2);
    short.as_object_mut().unwrap().remove("q12");
    let (status, _) = send(app(mild()), post_json("/predict", short.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(mild()), post_json("/predict", "{ nope".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_integrity_failure_is_generic_500() {
    let broken = Some(Box::new(Stub {
        class_id: 0,
        probabilities: Some(vec![0.5, 0.5]),
    }) as Box<dyn Classifier>);
    let (status, body) = send(app(broken), post_json("/predict", answers(1).to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(!message.contains("integrity"));
    assert!(!message.contains("probab"));
}

#[tokio::test]
async fn test_classifier_panic_is_contained() {
    let router = app(Some(Box::new(Panics)));
    let (status, _) = send(router.clone(), post_json("/predict", answers(1).to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // The process and router keep serving
    let (status, _) = send(router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_questions() {
    let (status, body) = send(app(None), get("/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 30);
    assert_eq!(body["questions"].as_array().unwrap().len(), 30);
    assert_eq!(body["questions"][0]["id"], "q1");
    assert_eq!(body["classes"][3]["label"], "Severe");
}

#[tokio::test]
async fn test_model_info() {
    let (status, body) = send(app(mild()), get("/model")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["state"], "loaded");
    assert_eq!(body["artifact"]["model_format"], "stub");
}

#[tokio::test]
async fn test_reload_route_disabled_by_default() {
    let (status, _) = send(app(mild()), post_json("/admin/reload", String::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reload_loads_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let coef: Vec<Vec<f64>> = (0..4).map(|k| vec![k as f64 / 30.0; 30]).collect();
    let model = json!({ "coef": coef, "intercept": [0.0, -2.5, -5.0, -7.5] });
    std::fs::write(dir.path().join("psychiatric_model.json"), model.to_string()).unwrap();

    let config = Config {
        allow_reload: true,
        ..config_for(dir.path())
    };
    let router = app_with(config, None);

    let (status, body) = send(router.clone(), post_json("/admin/reload", String::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"]["model_loaded"], true);
    assert!(body["model"]["artifact"]["checksum"]
        .as_str()
        .unwrap()
        .starts_with("sha256:"));

    let (status, body) = send(router, post_json("/predict", answers(4).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "Severe");
}

#[tokio::test]
async fn test_cors_allows_configured_origins() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://screening.vercel.app")
        .body(Body::empty())
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://screening.vercel.app"
    );

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
