//! Handler tests for the embedding domain
//!
//! Requests go through the real router backed by the feature-hashing
//! provider, so no model files are required.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_embedding::*;
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

const DIMENSION: usize = 384;

fn app() -> axum::Router {
    let provider = HashingProvider::new(DIMENSION, 256).unwrap();
    handlers::router(EmbeddingService::new(Arc::new(provider)))
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_embed_question_returns_model_dimension() {
    let request = post_json(json!({"question": "What is the refund policy?"}).to_string());

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: EmbedResponse = json_body(response.into_body()).await;
    assert_eq!(body.embedding.len(), DIMENSION);
    assert!(body.embedding.iter().all(|v| v.is_finite()));
}

#[tokio::test]
async fn test_same_question_same_vector() {
    let first: EmbedResponse = json_body(
        app()
            .oneshot(post_json(json!({"question": "opening hours"}).to_string()))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let second: EmbedResponse = json_body(
        app()
            .oneshot(post_json(json!({"question": "opening hours"}).to_string()))
            .await
            .unwrap()
            .into_body(),
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_question_returns_400() {
    let response = app()
        .oneshot(post_json(json!({"question": "   "}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.code, axum_helpers::ErrorCode::EmptyInput.code());
    assert!(body.message.contains("question"));
}

#[tokio::test]
async fn test_missing_question_field_returns_400() {
    let response = app()
        .oneshot(post_json(json!({"query": "hello"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert!(body.message.contains("question"));
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let response = app().oneshot(post_json("{\"question\": ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let _: ErrorResponse = json_body(response.into_body()).await;
}

#[tokio::test]
async fn test_index_and_model_info() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes, handlers::INDEX_TEXT.as_bytes());

    let response = app()
        .oneshot(Request::builder().uri("/model").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let info: ModelInfo = json_body(response.into_body()).await;
    assert_eq!(info.dimension, DIMENSION);
    assert_eq!(info.model_id, format!("feature-hashing-{}", DIMENSION));
}

#[tokio::test]
async fn test_openapi_document_lists_embed_path() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let doc: serde_json::Value = json_body(response.into_body()).await;
    assert!(doc["paths"]["/"]["post"].is_object());
}
