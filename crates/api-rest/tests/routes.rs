use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use api_rest::{app, AppState};
use triage_core::{
    EmergencyHistory, EmptyHistory, InMemoryHistory, RuleTable, StoredEmergency, TriageConfig,
    TriageService,
};

fn state_with(history: Arc<dyn EmergencyHistory>) -> AppState {
    AppState::new(
        TriageService::new(&TriageConfig::default(), history),
        Duration::from_secs(2),
    )
}

fn recorded_fractures() -> Arc<dyn EmergencyHistory> {
    let rows = (0..4)
        .map(|i| StoredEmergency {
            alert_code: Some("giallo".into()),
            description: Some("sospetta frattura polso dopo caduta".into()),
            created_at: chrono::DateTime::from_timestamp(1_760_000_000 + i, 0).unwrap(),
        })
        .collect();
    Arc::new(InMemoryHistory::new(rows))
}

async fn call(state: AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app(state)
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_alive() {
    let (status, body) = call(state_with(Arc::new(EmptyHistory)), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn suggest_combines_rules_and_history() {
    let (status, body) = call(
        state_with(recorded_fractures()),
        "POST",
        "/triage/suggest",
        Some(json!({
            "motivo_accesso": "frattura del polso",
            "vital_signs": { "oxygen_saturation": 97, "body_temperature": "36,8" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rule_based"]["code"], json!("giallo"));
    assert_eq!(body["history_based"]["code"], json!("giallo"));
    assert_eq!(body["history_based"]["matches"], json!(4));
    assert_eq!(body["code"], json!("giallo"));
}

#[tokio::test]
async fn low_saturation_is_red_whatever_the_motive() {
    let (status, body) = call(
        state_with(Arc::new(EmptyHistory)),
        "POST",
        "/triage/suggest",
        Some(json!({
            "motivo_accesso": "controllo",
            "vital_signs": { "oxygen_saturation": 88 }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], json!("rosso"));
    assert_eq!(body["history_based"], json!({"code": null, "reason": null, "matches": 0}));
}

#[tokio::test]
async fn short_motive_is_rejected() {
    let (status, body) = call(
        state_with(Arc::new(EmptyHistory)),
        "POST",
        "/triage/suggest",
        Some(json!({ "motivo_accesso": "  ab " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .starts_with("motivo_accesso"));
}

#[tokio::test]
async fn estimate_ignores_history() {
    let (status, body) = call(
        state_with(recorded_fractures()),
        "POST",
        "/triage/estimate",
        Some(json!({ "motivo_accesso": "dolore toracico improvviso" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], json!("rosso"));
    assert!(body.get("history_based").is_none());
}

#[tokio::test]
async fn rules_export_the_builtin_table() {
    let (status, body) = call(state_with(Arc::new(EmptyHistory)), "GET", "/triage/rules", None).await;
    assert_eq!(status, StatusCode::OK);

    let table = RuleTable::from_json(&body.to_string()).expect("exported table loads");
    assert_eq!(&table, RuleTable::builtin());
}

#[tokio::test]
async fn malformed_body_gets_error_json() {
    let (status, body) = call(
        state_with(Arc::new(EmptyHistory)),
        "POST",
        "/triage/suggest",
        Some(json!({ "motivo_accesso": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string(), "body: {body}");

    let (status, body) = call(
        state_with(Arc::new(EmptyHistory)),
        "POST",
        "/triage/estimate",
        Some(json!({ "codice_fiscale": "RSSMRA46M15H501X" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string(), "body: {body}");
}
