//! End-to-end tests for the `/api` routes.
//!
//! Each test starts a fake backend and the real router on ephemeral ports and
//! talks to the router with reqwest.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};
use server::AppState;
use services::services::backend_api::BackendClient;
use url::Url;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn start_proxy(backend_url: &str, timeout: Duration) -> String {
    let backend = BackendClient::new(Url::parse(backend_url).unwrap(), timeout).unwrap();
    spawn(server::app(AppState::new(backend))).await
}

/// A port nothing is listening on.
async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
    cache_headers: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Recorder {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn search_backend(recorder: Recorder, status: StatusCode, body: Value) -> Router {
    Router::new().route(
        "/naver/products",
        get(
            move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                recorder.hits.fetch_add(1, Ordering::SeqCst);
                if let Some(query) = params.get("query") {
                    recorder.queries.lock().unwrap().push(query.clone());
                }
                if let Some(value) = headers.get("cache-control") {
                    recorder
                        .cache_headers
                        .lock()
                        .unwrap()
                        .push(value.to_str().unwrap().to_string());
                }
                (status, Json(body))
            },
        ),
    )
}

fn summary_backend(recorder: Recorder, status: StatusCode, body: Value) -> Router {
    Router::new().route(
        "/review/summary",
        post(move |Json(input): Json<Value>| async move {
            recorder.hits.fetch_add(1, Ordering::SeqCst);
            recorder.bodies.lock().unwrap().push(input);
            (status, Json(body))
        }),
    )
}

fn products() -> Value {
    json!([
        { "name": "Runner A", "thumbnail_url": "https://img.example/a.png", "price": 30000, "info_url": "https://shop.example/a" },
        { "name": "Runner B", "thumbnail_url": "https://img.example/b.png", "price": 10000, "info_url": "https://shop.example/b" },
        { "name": "Runner C", "thumbnail_url": "https://img.example/c.png", "price": 20000, "info_url": "https://shop.example/c" },
    ])
}

fn summary_input() -> Value {
    json!({
        "name": "Runner A",
        "thumbnail_url": "https://img.example/a.png",
        "price": "30000",
        "info_url": "https://shop.example/a",
    })
}

#[tokio::test]
async fn test_health_check() {
    let base = start_proxy(&dead_backend().await, Duration::from_secs(1)).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_search_returns_backend_items() {
    let recorder = Recorder::default();
    let backend = spawn(search_backend(
        recorder.clone(),
        StatusCode::OK,
        json!({ "items": products(), "total": 3 }),
    ))
    .await;
    let base = start_proxy(&backend, Duration::from_secs(5)).await;

    let resp = reqwest::Client::new()
        .get(format!("{base}/api/search"))
        .query(&[("keyword", "  running shoes & socks ")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "results": products() }));
    assert_eq!(recorder.hits(), 1);
    assert_eq!(
        *recorder.queries.lock().unwrap(),
        vec!["running shoes & socks".to_string()]
    );
    assert_eq!(
        *recorder.cache_headers.lock().unwrap(),
        vec!["no-cache".to_string()]
    );
}

#[tokio::test]
async fn test_search_without_items_is_empty() {
    let recorder = Recorder::default();
    let backend = spawn(search_backend(recorder.clone(), StatusCode::OK, json!({}))).await;
    let base = start_proxy(&backend, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("{base}/api/search?keyword=shoes"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "results": [] }));
    assert_eq!(recorder.hits(), 1);
}

#[tokio::test]
async fn test_search_blank_keyword_never_reaches_backend() {
    let recorder = Recorder::default();
    let backend = spawn(search_backend(
        recorder.clone(),
        StatusCode::OK,
        json!({ "items": [] }),
    ))
    .await;
    let base = start_proxy(&backend, Duration::from_secs(5)).await;

    for url in [
        format!("{base}/api/search"),
        format!("{base}/api/search?keyword="),
        format!("{base}/api/search?keyword=%20%20%20"),
    ] {
        let resp = reqwest::get(url).await.unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "keyword is required" }));
    }

    assert_eq!(recorder.hits(), 0);
}

#[tokio::test]
async fn test_search_backend_503_is_502_with_status() {
    let recorder = Recorder::default();
    let backend = spawn(search_backend(
        recorder.clone(),
        StatusCode::SERVICE_UNAVAILABLE,
        Value::Null,
    ))
    .await;
    let base = start_proxy(&backend, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("{base}/api/search?keyword=shoes"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);

    let body: Value = resp.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("503"), "unexpected error text: {error}");
    assert_eq!(recorder.hits(), 1);
}

#[tokio::test]
async fn test_search_unreachable_backend_is_500() {
    let base = start_proxy(&dead_backend().await, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("{base}/api/search?keyword=shoes"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "failed to fetch products" }));
}

#[tokio::test]
async fn test_search_slow_backend_times_out_as_500() {
    let backend = spawn(Router::new().route(
        "/naver/products",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "items": [] }))
        }),
    ))
    .await;
    let base = start_proxy(&backend, Duration::from_millis(200)).await;

    let resp = reqwest::get(format!("{base}/api/search?keyword=shoes"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn test_summary_returns_backend_body_unmodified() {
    let recorder = Recorder::default();
    let upstream_body = json!({
        "analysis": {
            "summary": "Comfortable and light.",
            "positive_features": "comfort, weight",
            "negative_features": "sizing runs small",
            "keywords": ["comfort", "weight", "sizing"],
            "pdf_url": "https://files.example/a.pdf",
        },
        "elapsed_ms": 18250,
    });
    let backend = spawn(summary_backend(
        recorder.clone(),
        StatusCode::OK,
        upstream_body.clone(),
    ))
    .await;
    let base = start_proxy(&backend, Duration::from_secs(5)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/summary"))
        .json(&summary_input())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, upstream_body);
    assert_eq!(recorder.hits(), 1);
    assert_eq!(*recorder.bodies.lock().unwrap(), vec![summary_input()]);
}

#[tokio::test]
async fn test_summary_missing_field_never_reaches_backend() {
    let recorder = Recorder::default();
    let backend = spawn(summary_backend(recorder.clone(), StatusCode::OK, json!({}))).await;
    let base = start_proxy(&backend, Duration::from_secs(5)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/summary"))
        .json(&json!({ "name": "", "thumbnail_url": "x", "price": "1", "info_url": "y" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "missing required fields: name" }));

    let resp = client
        .post(format!("{base}/api/summary"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    assert_eq!(recorder.hits(), 0);
}

#[tokio::test]
async fn test_summary_backend_error_is_502() {
    let recorder = Recorder::default();
    let backend = spawn(summary_backend(
        recorder.clone(),
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "crawler failed" }),
    ))
    .await;
    let base = start_proxy(&backend, Duration::from_secs(5)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/summary"))
        .json(&summary_input())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);

    let body: Value = resp.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("500"));
    assert!(error.contains("crawler failed"));
}

#[tokio::test]
async fn test_summary_unreachable_backend_is_500() {
    let base = start_proxy(&dead_backend().await, Duration::from_secs(5)).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/summary"))
        .json(&summary_input())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "failed to fetch summary from backend" }));
}
