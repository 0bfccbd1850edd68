use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use pc_core::OutputLanguage;
use pc_rewriter::{Diagnostic, OptimizationResult, TextStats};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

const SERVICE_NAME: &str = "prompt-compress";

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/optimize", post(optimize))
        .route("/api/v1/validate", post(validate))
        .route("/api/v1/estimate", post(estimate))
        .route("/api/v1/catalog", get(catalog))
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub prompt: String,
    #[serde(default)]
    pub output_language: Option<OutputLanguage>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub request_id: Uuid,
    #[serde(flatten)]
    pub result: OptimizationResult,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub clean: bool,
    pub diagnostics: Vec<Diagnostic>,
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_version": state.pipeline.catalog().version(),
        "uptime_secs": state.uptime_secs(),
    }))
}

async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let Json(req) = payload?;
    let request_id = Uuid::new_v4();
    let language = req.output_language.unwrap_or_else(|| state.pipeline.language());
    let pipeline = state.pipeline.clone();

    let result = tokio::task::spawn_blocking(move || pipeline.optimize_as(&req.prompt, language)).await?;
    tracing::info!(
        %request_id,
        token_savings = result.savings.token_savings,
        diagnostics = result.diagnostics.len(),
        "optimize"
    );
    Ok(Json(OptimizeResponse { request_id, result }))
}

async fn validate(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let Json(req) = payload?;
    let diagnostics = state.pipeline.validate(&req.text);
    Ok(Json(ValidateResponse { clean: diagnostics.is_empty(), diagnostics }))
}

async fn estimate(payload: Result<Json<TextRequest>, JsonRejection>) -> Result<Json<TextStats>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(TextStats::of(&req.text)))
}

async fn catalog(State(state): State<AppState>) -> Json<Value> {
    let catalog = state.pipeline.catalog();
    let phases: Vec<Value> = catalog
        .summary()
        .into_iter()
        .map(|p| json!({ "phase": p.phase, "count": p.rules.len(), "rules": p.rules }))
        .collect();
    Json(json!({
        "version": catalog.version(),
        "rules": catalog.len(),
        "phases": phases,
    }))
}
