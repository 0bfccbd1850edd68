use crate::*;
use axum::body::Body;
use axum::Router;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pc_core::CompressConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "prompt-compress");
    assert_eq!(body["catalog_version"], pc_rewriter::CATALOG_VERSION);
}

// ========== Optimize ==========

#[tokio::test]
async fn test_optimize_scenario() {
    let (status, body) = send(app(), post_json("/api/v1/optimize", json!({"prompt": "please kindly review"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "Review\n\n[output_language: english]");
    assert_eq!(body["rewritten"], "Review");
    assert!(body["request_id"].as_str().unwrap().len() == 36);
    assert!(body["savings"]["token_savings"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn test_optimize_empty_prompt() {
    let (status, body) = send(app(), post_json("/api/v1/optimize", json!({"prompt": ""}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "\n\n[output_language: english]");
}

#[tokio::test]
async fn test_optimize_language_override() {
    let req = post_json("/api/v1/optimize", json!({"prompt": "Summarize it.", "output_language": "mandarin"}));
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "mandarin");
    assert!(body["output"].as_str().unwrap().ends_with("[output_language: mandarin]"));
}

#[tokio::test]
async fn test_optimize_missing_prompt() {
    let (status, body) = send(app(), post_json("/api/v1/optimize", json!({"text": "wrong field"}))).await;
    assert!(status.is_client_error());
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"].as_str().unwrap().contains("prompt"));
}

#[tokio::test]
async fn test_optimize_malformed_json() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/optimize")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_optimize_uses_configured_pipeline() {
    let config = CompressConfig::from_json_str(r#"{"output_language":"mandarin"}"#).unwrap();
    let state = state::AppState::from_config(&config).unwrap();
    let (_, body) = send(app_with_state(state), post_json("/api/v1/optimize", json!({"prompt": "please review"}))).await;
    assert_eq!(body["output"], "Review\n\n[output_language: mandarin]");
}

// ========== Validate / estimate ==========

#[tokio::test]
async fn test_validate() {
    let (status, body) = send(app(), post_json("/api/v1/validate", json!({"text": "Fix it. for your help."}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clean"], false);
    let kinds: Vec<&str> = body["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"orphan_phrase"));
    assert!(kinds.contains(&"lowercase_start"));
}

#[tokio::test]
async fn test_validate_clean() {
    let (_, body) = send(app(), post_json("/api/v1/validate", json!({"text": "Summarize the report."}))).await;
    assert_eq!(body["clean"], true);
    assert_eq!(body["diagnostics"], json!([]));
}

#[tokio::test]
async fn test_estimate() {
    let (status, body) = send(app(), post_json("/api/v1/estimate", json!({"text": "one two three four."}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"words": 4, "tokens": 3}));
}

// ========== Catalog ==========

#[tokio::test]
async fn test_catalog() {
    let req = Request::builder().uri("/api/v1/catalog").body(Body::empty()).unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    let phases = body["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 8);
    assert_eq!(phases[0]["phase"], "politeness");
    assert_eq!(phases[7]["phase"], "whitespace_cleanup");
    let total: u64 = phases.iter().map(|p| p["count"].as_u64().unwrap()).sum();
    assert_eq!(body["rules"].as_u64().unwrap(), total);
}

#[tokio::test]
async fn test_unknown_route() {
    let req = Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap();
    let (status, _) = send(app(), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
