//! Integration tests for the EMY display server.
//!
//! Each test runs the real router against a local mock upstream, so no
//! external network access is needed.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use emy_display::api::{create_router, AppState};
use emy_display::config::Config;
use emy_display::upstream::mock::{unreachable_url, MockResponse, MockUpstream};

const FAILED: &str = "Internal error happened. Try again";

fn app(config: Config) -> Router {
    create_router(AppState::new(&config).expect("client builds"))
}

async fn fetch_envelope(app: Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/display/getemypatient")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn envelope_for(response: MockResponse) -> (StatusCode, Value) {
    let mock = MockUpstream::spawn(response).await.unwrap();
    fetch_envelope(app(Config::with_upstream(mock.url()))).await
}

#[tokio::test]
async fn test_well_formed_upstream() {
    let (status, body) =
        envelope_for(MockResponse::json(json!({"emy": {"a": {"id": 1}, "b": {"id": 2}}}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "data": [{"id": 1}, {"id": 2}]}));
}

#[tokio::test]
async fn test_upstream_order_is_preserved() {
    let (_, body) = envelope_for(MockResponse::raw(
        r#"{"emy": {"bed-9": {"bed": 9}, "bed-1": {"bed": 1}, "bed-5": {"bed": 5}}}"#,
    ))
    .await;

    assert_eq!(
        body["data"],
        json!([{"bed": 9}, {"bed": 1}, {"bed": 5}])
    );
}

#[tokio::test]
async fn test_records_pass_through_unchanged() {
    let record = json!({
        "name": "PATIENT A",
        "vitals": {"hr": 88, "spo2": 97.5, "alarms": ["LOW_BP"]},
        "discharged": null
    });
    let (_, body) = envelope_for(MockResponse::json(json!({"emy": {"x": record.clone()}}))).await;

    assert_eq!(body["data"], json!([record]));
}

#[tokio::test]
async fn test_upstream_error_status_is_ignored() {
    let (status, body) = envelope_for(
        MockResponse::json(json!({"emy": {"a": {"id": 1}}}))
            .with_status(StatusCode::INTERNAL_SERVER_ERROR),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "data": [{"id": 1}]}));
}

#[tokio::test]
async fn test_empty_mapping() {
    let (status, body) = envelope_for(MockResponse::json(json!({"emy": {}}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "data": []}));
}

#[tokio::test]
async fn test_unreachable_upstream() {
    let config = Config::with_upstream(unreachable_url().unwrap());
    let (status, body) = fetch_envelope(app(config)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "failed", "message": FAILED}));
}

#[tokio::test]
async fn test_missing_emy_field() {
    let (status, body) = envelope_for(MockResponse::json(json!({"patients": {}}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "failed", "message": FAILED}));
}

#[tokio::test]
async fn test_non_json_body() {
    let (status, body) = envelope_for(MockResponse::raw("upstream maintenance")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "failed", "message": FAILED}));
}

#[tokio::test]
async fn test_null_emy_field() {
    let (_, body) = envelope_for(MockResponse::json(json!({"emy": null}))).await;
    assert_eq!(body, json!({"status": "failed", "message": FAILED}));
}

#[tokio::test]
async fn test_slow_upstream_hits_timeout() {
    let mock = MockUpstream::spawn(
        MockResponse::json(json!({"emy": {"a": 1}})).with_delay(Duration::from_secs(3)),
    )
    .await
    .unwrap();

    let mut config = Config::with_upstream(mock.url());
    config.timeout_ms = 200;
    let (status, body) = fetch_envelope(app(config)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "failed", "message": FAILED}));
}

#[tokio::test]
async fn test_each_request_fetches_fresh() {
    let mock = MockUpstream::spawn(MockResponse::json(json!({"emy": {"a": 1}})))
        .await
        .unwrap();
    let router = app(Config::with_upstream(mock.url()));

    fetch_envelope(router.clone()).await;
    fetch_envelope(router).await;

    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn test_pages_ignore_upstream_availability() {
    let router = app(Config::with_upstream(unreachable_url().unwrap()));

    for uri in ["/", "/display", "/display/"] {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn test_custom_title_is_rendered() {
    let mut config = Config::with_upstream(unreachable_url().unwrap());
    config.app_title = "WARD 3 MONITOR".to_string();

    let response = app(config)
        .oneshot(Request::builder().uri("/display").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    assert!(String::from_utf8_lossy(&body).contains("<title>WARD 3 MONITOR</title>"));
}
