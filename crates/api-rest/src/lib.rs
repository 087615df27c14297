//! # API REST
//!
//! REST API implementation for triage priority suggestion.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::rest::{
    ErrorRes, HistoryBasedRes, RuleBasedRes, SuggestPriorityReq, SuggestPriorityRes,
    VitalSignsReq,
};
use api_shared::{pb, HealthService, HistoryGate};
use triage_core::service::today;
use triage_core::{RuleTable, TriageInput, TriageService};

/// Application state for the REST API server
///
/// Holds the triage service shared by every handler and the gate bounding its history reads.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: TriageService,
    pub history: HistoryGate,
}

impl AppState {
    pub fn new(service: TriageService, history_deadline: Duration) -> Self {
        Self {
            service,
            history: HistoryGate::new(history_deadline),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, suggest, estimate, rules),
    components(schemas(
        pb::HealthRes,
        SuggestPriorityReq,
        VitalSignsReq,
        SuggestPriorityRes,
        RuleBasedRes,
        HistoryBasedRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

type ApiError = (StatusCode, Json<ErrorRes>);

fn bad_request(field: &str, err: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorRes {
            error: format!("{}: {}", field, err),
        }),
    )
}

fn parse_request(
    payload: Result<Json<SuggestPriorityReq>, JsonRejection>,
) -> Result<TriageInput, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        (
            rejection.status(),
            Json(ErrorRes {
                error: rejection.body_text(),
            }),
        )
    })?;
    req.into_input().map_err(|e| bad_request("motivo_accesso", e))
}

/// Builds the router with every triage route, Swagger UI and a permissive CORS layer.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/triage/suggest", post(suggest))
        .route("/triage/estimate", post(estimate))
        .route("/triage/rules", get(rules))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = pb::HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<pb::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/triage/suggest",
    request_body = SuggestPriorityReq,
    responses(
        (status = 200, description = "Suggested priority code", body = SuggestPriorityRes),
        (status = 400, description = "Invalid access motive", body = ErrorRes),
        (status = 422, description = "Malformed request body", body = ErrorRes)
    )
)]
/// Suggest a priority code for an access request
///
/// Evaluates the rule engine and the recent-history suggester and returns the more urgent of the
/// two, together with both branches. A history store that fails or misses the deadline degrades
/// the answer to the rule-based branch; it never fails the request.
///
/// # Errors
/// Returns `400 Bad Request` if `motivo_accesso` is shorter than 3 characters once trimmed, and
/// the extractor's status (usually `422`) with an `{error}` body if the JSON is malformed.
#[axum::debug_handler]
async fn suggest(
    State(state): State<AppState>,
    payload: Result<Json<SuggestPriorityReq>, JsonRejection>,
) -> Result<Json<SuggestPriorityRes>, ApiError> {
    let input = parse_request(payload)?;
    let result = state.history.suggest(&state.service, &input).await;
    Ok(Json(SuggestPriorityRes::from(&result)))
}

#[utoipa::path(
    post,
    path = "/triage/estimate",
    request_body = SuggestPriorityReq,
    responses(
        (status = 200, description = "Rule-based priority code", body = RuleBasedRes),
        (status = 400, description = "Invalid access motive", body = ErrorRes),
        (status = 422, description = "Malformed request body", body = ErrorRes)
    )
)]
/// Estimate a priority code from the rule table alone
///
/// The history store is not read.
#[axum::debug_handler]
async fn estimate(
    State(state): State<AppState>,
    payload: Result<Json<SuggestPriorityReq>, JsonRejection>,
) -> Result<Json<RuleBasedRes>, ApiError> {
    let input = parse_request(payload)?;
    let rules = state.service.evaluate_rules(&input, today());
    Ok(Json(RuleBasedRes::from(&rules)))
}

#[utoipa::path(
    get,
    path = "/triage/rules",
    responses(
        (status = 200, description = "Rule table evaluated by the server", content_type = "application/json")
    )
)]
/// Export the rule table evaluated by the server
#[axum::debug_handler]
async fn rules(State(state): State<AppState>) -> Json<RuleTable> {
    Json(state.service.engine().table().clone())
}
