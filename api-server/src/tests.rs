use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::Response,
    Router,
};
use flowguard_core::logic::audit::MemoryAuditSink;
use flowguard_core::logic::model::testing::{FailingClassifier, FixedBinary, FixedMulticlass};
use flowguard_core::{
    BinaryClassifier, DecisionPipeline, ModelMetadata, MulticlassClassifier, Normalizer, ThresholdConfig,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::models::RequestStats;
use crate::{create_router, AppState};

struct TestApp {
    router: Router,
    audit: Arc<MemoryAuditSink>,
    stats: Arc<RequestStats>,
}

fn app<B, M>(binary: B, multiclass: M) -> TestApp
where
    B: BinaryClassifier + 'static,
    M: MulticlassClassifier + 'static,
{
    let model = Arc::new(ModelMetadata::in_memory(&binary, &multiclass));
    let pipeline = DecisionPipeline::new(
        Normalizer::identity(),
        Box::new(binary),
        Box::new(multiclass),
        ThresholdConfig::default(),
    );
    let audit = Arc::new(MemoryAuditSink::new(64));
    let stats = Arc::new(RequestStats::default());

    let state = AppState {
        pipeline: Arc::new(pipeline),
        model,
        audit: audit.clone(),
        stats: stats.clone(),
        config: Config::default(),
    };

    TestApp {
        router: create_router(state),
        audit,
        stats,
    }
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/submit")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/submit")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// SUBMIT
// ============================================================================

#[tokio::test]
async fn test_submit_json_attack() {
    let t = app(FixedBinary::scalar(0.9), FixedMulticlass::new("BRUTE_FORCE", 0.8));
    let response = send(
        &t.router,
        post_json(json!({
            "duration": 2.0, "src_bytes": 10, "dst_bytes": 5,
            "pkt_rate": 0.5, "failed_logins": 6, "note": "ssh"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "binary_label": "ATTACK",
            "binary_score": 0.9,
            "attack_type": "BRUTE_FORCE",
            "attack_confidence": 0.8
        })
    );

    let records = t.audit.recent(10);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].note, "ssh");
    assert_eq!(records[0].client_ip, "-");
    assert_eq!(records[1].note, "model:ATTACK score:0.9 type:BRUTE_FORCE");
}

#[tokio::test]
async fn test_submit_form_with_decimal_comma() {
    let t = app(FixedBinary::two_class(0.8, 0.2), FixedMulticlass::new("BOT", 0.5));
    let response = send(&t.router, post_form("duration=0%2C3&pkt_rate=&note=form")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({"binary_label": "BENIGN", "binary_score": 0.8}));

    let records = t.audit.recent(1);
    assert_eq!(records[0].duration, 0.3);
    assert_eq!(records[0].pkt_rate, 0.0);
}

#[tokio::test]
async fn test_submit_multipart_form() {
    let t = app(FixedBinary::scalar(0.9), FixedMulticlass::new("BRUTE_FORCE", 0.7));
    let body = concat!(
        "--XX\r\n",
        "Content-Disposition: form-data; name=\"duration\"\r\n\r\n",
        "0,4\r\n",
        "--XX\r\n",
        "Content-Disposition: form-data; name=\"failed_logins\"\r\n\r\n",
        "6\r\n",
        "--XX\r\n",
        "Content-Disposition: form-data; name=\"note\"\r\n\r\n",
        "multipart\r\n",
        "--XX--\r\n",
    );
    let request = Request::builder()
        .method("POST")
        .uri("/submit")
        .header(CONTENT_TYPE, "multipart/form-data; boundary=XX")
        .body(Body::from(body))
        .unwrap();

    let response = send(&t.router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["binary_label"], "ATTACK");
    assert_eq!(body["attack_type"], "BRUTE_FORCE");

    let records = t.audit.recent(2);
    assert_eq!(records[0].duration, 0.4);
    assert_eq!(records[0].failed_logins, 6.0);
    assert_eq!(records[0].note, "multipart");
}

#[tokio::test]
async fn test_submit_repeated_form_field_keeps_first() {
    let t = app(FixedBinary::scalar(0.1), FixedMulticlass::new("BOT", 0.5));
    let response = send(&t.router, post_form("duration=1&duration=abc")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.audit.recent(1)[0].duration, 1.0);
}

#[tokio::test]
async fn test_submit_invalid_input_is_400() {
    let t = app(FixedBinary::scalar(0.9), FixedMulticlass::new("BOT", 0.5));
    let response = send(&t.router, post_json(json!({"duration": "abc"}))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid input");
    assert_eq!(body["field"], "duration");
    assert_eq!(body["status"], 400);

    assert!(t.audit.is_empty());
    assert_eq!(t.stats.snapshot().rejected, 1);
}

#[tokio::test]
async fn test_submit_non_object_json_is_400() {
    let t = app(FixedBinary::scalar(0.1), FixedMulticlass::new("BOT", 0.5));
    let response = send(&t.router, post_json(json!([1, 2, 3]))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_binary_failure_is_500() {
    let t = app(FailingClassifier::new("weights missing"), FixedMulticlass::new("BOT", 0.5));
    let response = send(&t.router, post_json(json!({"duration": 1}))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "model binary predict error: weights missing");

    assert_eq!(t.audit.len(), 1);
    assert_eq!(t.stats.snapshot().failed, 1);
}

#[tokio::test]
async fn test_submit_degraded_is_200_with_note() {
    let t = app(FixedBinary::scalar(0.95), FailingClassifier::new("bad shape"));
    let response = send(&t.router, post_json(json!({"pkt_rate": 1500}))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["binary_label"], "ATTACK");
    assert_eq!(body["attack_type"], Value::Null);
    assert_eq!(body["attack_confidence"], 0.0);
    assert_eq!(body["note"], "multiclass error: bad shape");

    assert_eq!(t.stats.snapshot().degraded, 1);
}

#[tokio::test]
async fn test_forwarded_for_is_client_identity() {
    let t = app(FixedBinary::scalar(0.1), FixedMulticlass::new("BOT", 0.5));
    let mut request = post_json(json!({}));
    request
        .headers_mut()
        .insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());

    let response = send(&t.router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(t.audit.recent(2).iter().all(|r| r.client_ip == "203.0.113.9"));
}

#[tokio::test]
async fn test_unsupported_media_type() {
    let t = app(FixedBinary::scalar(0.1), FixedMulticlass::new("BOT", 0.5));
    let request = Request::builder()
        .method("POST")
        .uri("/submit")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from("duration=1"))
        .unwrap();

    let response = send(&t.router, request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_empty_body_reads_as_zero_flow() {
    let t = app(FixedBinary::scalar(0.1), FixedMulticlass::new("BOT", 0.5));
    let request = Request::builder()
        .method("POST")
        .uri("/submit")
        .body(Body::empty())
        .unwrap();

    let response = send(&t.router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.audit.recent(1)[0].src_bytes, 0.0);
}

// ============================================================================
// STATUS
// ============================================================================

#[tokio::test]
async fn test_health() {
    let t = app(FixedBinary::scalar(0.1), FixedMulticlass::new("BOT", 0.5));
    let response = send(&t.router, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["threshold"], 0.6);
}

#[tokio::test]
async fn test_model_status_counts_requests() {
    let t = app(FixedBinary::scalar(0.9), FixedMulticlass::new("DDoS", 0.7));
    send(&t.router, post_json(json!({"pkt_rate": 900}))).await;
    send(&t.router, post_json(json!({"pkt_rate": "x"}))).await;

    let response = send(&t.router, get("/api/v1/model")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["model"]["binary_model"], "fixed-binary");
    assert_eq!(body["model"]["layout"]["feature_count"], 5);
    assert_eq!(body["stats"]["requests"], 2);
    assert_eq!(body["stats"]["attacks"], 1);
    assert_eq!(body["stats"]["rejected"], 1);
    assert_eq!(body["audit"]["format"], "csv");
}

#[tokio::test]
async fn test_index_page() {
    let t = app(FixedBinary::scalar(0.1), FixedMulticlass::new("BOT", 0.5));
    let response = send(&t.router, get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("action=\"/submit\""));
}
