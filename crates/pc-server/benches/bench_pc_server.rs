use axum::body::Body;
use axum::http::Request;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pc_server::{app_with_state, state::AppState};
use tokio::runtime::Runtime;
use tower::ServiceExt;

fn bench_http_health(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let state = AppState::new();
    c.bench_function("http_health_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                for _ in 0..1000 {
                    let app = app_with_state(state.clone());
                    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

fn bench_http_optimize(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let state = AppState::new();
    let body = serde_json::json!({
        "prompt": "I would really appreciate it if you could please help me analyze this code. Thank you so much in advance for your help!"
    });
    let bytes = serde_json::to_vec(&body).unwrap();

    c.bench_function("http_optimize_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                for _ in 0..100 {
                    let app = app_with_state(state.clone());
                    let req = Request::builder()
                        .method("POST")
                        .uri("/api/v1/optimize")
                        .header("content-type", "application/json")
                        .body(Body::from(bytes.clone()))
                        .unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

criterion_group!(benches, bench_http_health, bench_http_optimize);
criterion_main!(benches);
