//! API parity tests — the chat client posts `{user_input}` to
//! `/get_response` and renders the `response` string as HTML.
//!
//! Each test builds the full router over a small JSON catalog with the
//! hashing embedder and drives it in-process with `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use schemesage_core::{EmbedderKind, Profile, SchemeSageConfig};
use schemesage_server::{build_router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

fn catalog() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "Pradhan Mantri Jan Arogya Yojana",
            "sector": "Health",
            "description": "Health insurance cover for poor families",
            "objectives": "Reduce hospital expenses",
            "eligibility_criteria": "Families listed in the socio economic census",
            "benefits": "Cover of five lakh per family per year",
            "implementation_agency": "National Health Authority",
            "application_process": "Visit an empanelled hospital",
            "documents_required": "Aadhaar card, ration card"
        },
        {
            "name": "PM Kisan Samman Nidhi",
            "sector": "Agriculture",
            "description": "Income support for small and marginal farmers",
            "benefits": "Six thousand rupees per year in three instalments"
        },
        {
            "name": "National Scholarship Portal",
            "sector": "Education",
            "description": "Scholarships for students from minority communities",
            "benefits": "Tuition fee and maintenance allowance"
        }
    ])
}

fn app(profile: Profile) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("schemes.json");
    std::fs::write(&catalog_path, catalog().to_string()).unwrap();

    let config = SchemeSageConfig {
        catalog_path,
        embedder: EmbedderKind::Hashing,
        embedding_dim: 128,
        profile,
        ..Default::default()
    };
    let engine = schemesage_runtime::bootstrap(&config).unwrap();
    (build_router(Arc::new(AppState::new(engine))), dir)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn ask(app: Router, body: String) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/get_response")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

async fn ask_input(app: Router, input: &str) -> (StatusCode, serde_json::Value) {
    ask(app, serde_json::json!({ "user_input": input }).to_string()).await
}

#[tokio::test]
async fn test_response_shape() {
    let (app, _dir) = app(Profile::Extended);
    let (status, json) = ask_input(app, "health insurance for families").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["response"].is_string());
    assert!(json["outcome"].is_string());
    assert_eq!(json["outcome"], "answered");
    let text = json["response"].as_str().unwrap();
    assert!(text.contains("<b>Sector:</b>"));
    assert!(text.contains("<br>"));
}

#[tokio::test]
async fn test_greeting() {
    let (app, _dir) = app(Profile::Extended);
    let (status, json) = ask_input(app, "hey there").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "greeting");
}

#[tokio::test]
async fn test_empty_and_missing_input() {
    let (app, _dir) = app(Profile::Basic);
    let (status, json) = ask_input(app.clone(), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "empty_input");
    assert_eq!(json["response"], "Please provide an input.");

    let (_, json) = ask(app.clone(), "{}".into()).await;
    assert_eq!(json["outcome"], "empty_input");

    let (_, json) = ask(app.clone(), r#"{"user_input": null}"#.into()).await;
    assert_eq!(json["outcome"], "empty_input");

    let (status, json) = ask(app, "not json".into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "empty_input");
}

#[tokio::test]
async fn test_punctuation_only() {
    let (app, _dir) = app(Profile::Basic);
    let (status, json) = ask_input(app, "???").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "invalid_query");
}

#[tokio::test]
async fn test_gibberish_rejected_by_extended_profile() {
    let (app, _dir) = app(Profile::Extended);
    let (status, json) = ask_input(app, "qwzx vbnm plokij").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "invalid_query");
}

#[tokio::test]
async fn test_more_than_catalog_appends_notice() {
    let (app, _dir) = app(Profile::Basic);
    let (_, json) = ask_input(app, "list 5 schemes for farmers").await;
    assert_eq!(json["outcome"], "answered");
    let text = json["response"].as_str().unwrap();
    assert_eq!(text.matches(&"-".repeat(40)).count(), 3);
    assert!(text.contains("up to 10 schemes"));
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = app(Profile::Basic);
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_stats_shape() {
    let (app, _dir) = app(Profile::Basic);
    let request = Request::builder().uri("/api/stats").body(Body::empty()).unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["schemes"], 3);
    assert_eq!(json["embeddingDimension"], 128);
    assert_eq!(json["embedder"], "fnv1a-hashing");
    assert_eq!(json["profile"], "basic");
    assert_eq!(json["catalogFingerprint"].as_str().unwrap().len(), 64);
    assert!(json["cacheEntries"].is_number());
    assert_eq!(json["retrievalLimit"], 8);
    assert_eq!(json["retrievalsInFlight"], 0);
    assert!(json["startedAt"].is_string());
    assert!(json["uptimeSeconds"].is_number());
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _dir) = app(Profile::Basic);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/get_response")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
