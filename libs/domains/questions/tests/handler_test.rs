//! Handler tests for the data explorer routes

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_questions::*;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()
use utoipa::OpenApi;

fn export(n: i64) -> Arc<Vec<QuestionRecord>> {
    Arc::new(
        (1..=n)
            .map(|id| QuestionRecord {
                id,
                created_at: None,
                question: Some(format!("question {}", id)),
                prompt: Some("prompt".into()),
                prompt_length: Some(6),
                answer: Some("answer".into()),
            })
            .collect(),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_df_redirects_to_new_snapshot() {
    let explorer = Arc::new(DataExplorer::default());
    let app = handlers::router(explorer.clone(), export(3)).unwrap();

    let response = app.clone().oneshot(get("/create-df")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/explore/"));
    assert_eq!(explorer.len().await, 1);

    let response = app.clone().oneshot(get(&location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("question 3"));

    let response = app
        .oneshot(get(&format!("{}/data?offset=1&limit=1", location)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: DataPage = json_body(response.into_body()).await;
    assert_eq!(page.total, 3);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].id, 2);
}

#[tokio::test]
async fn test_each_create_df_gets_a_fresh_id() {
    let app = handlers::router(Arc::new(DataExplorer::default()), export(1)).unwrap();

    let a = app.clone().oneshot(get("/create-df")).await.unwrap();
    let b = app.oneshot(get("/create-df")).await.unwrap();

    assert_ne!(a.headers()[header::LOCATION], b.headers()[header::LOCATION]);
}

#[tokio::test]
async fn test_unknown_or_malformed_id_returns_404() {
    let app = handlers::router(Arc::new(DataExplorer::default()), export(1)).unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/explore/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/explore/not-a-uuid/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_openapi_lists_data_endpoint() {
    let doc = serde_json::to_value(handlers::ApiDoc::openapi()).unwrap();
    assert!(doc["paths"]["/explore/{data_id}/data"]["get"].is_object());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = handlers::router(Arc::new(DataExplorer::default()), export(1)).unwrap();

    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let doc: serde_json::Value = json_body(response.into_body()).await;
    assert!(doc["paths"]["/explore/{data_id}/data"].is_object());
}
