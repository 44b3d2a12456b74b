//! Handler tests for the dashboard routes

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use domain_dashboard::*;
use http_body_util::BodyExt;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

use sea_orm::{DatabaseBackend, MockDatabase, Value};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn small_config() -> DashboardConfig {
    DashboardConfig {
        tsne_iterations: 30,
        ..Default::default()
    }
}

fn sample_data() -> DashboardData {
    DashboardData {
        default_questions: vec![
            DefaultQuestion {
                question: "What are your opening hours?".into(),
                cnt: 14,
            },
            DefaultQuestion {
                question: "How do I reset my password?".into(),
                cnt: 12,
            },
        ],
        total_questions: 40,
        question_timestamps: (1..=5)
            .map(|d| Utc.with_ymd_and_hms(2023, 6, d, 12, 0, 0).unwrap())
            .collect(),
        sections: vec![],
    }
}

#[tokio::test]
async fn test_overview_page() {
    let dashboard = Arc::new(Dashboard::render(&sample_data(), &small_config()).unwrap());
    let app = handlers::router(dashboard);

    let response = app.oneshot(get("/dashboard/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    let html = body_text(response.into_body()).await;
    assert!(html.contains("Distribution default questions"));
    assert!(html.contains("What are your opening hours?"));
    assert!(html.contains(r#""values":[26,14]"#));
}

#[tokio::test]
async fn test_embeddings_page() {
    let dashboard = Arc::new(Dashboard::render(&sample_data(), &small_config()).unwrap());
    let app = handlers::router(dashboard);

    let response = app.oneshot(get("/dashboard/embeddings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response.into_body()).await.contains("Embedding space"));
}

#[tokio::test]
async fn test_unknown_dashboard_path_is_404() {
    let dashboard = Arc::new(Dashboard::render(&DashboardData::default(), &small_config()).unwrap());
    let app = handlers::router(dashboard);

    let response = app.oneshot(get("/dashboard/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn row(pairs: &[(&'static str, Value)]) -> BTreeMap<&'static str, Value> {
    pairs.iter().cloned().collect()
}

#[tokio::test]
async fn test_build_runs_queries_in_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(&[
            ("question", Value::from("What are your opening hours?")),
            ("cnt", Value::BigInt(Some(14))),
        ])]])
        .append_query_results([vec![row(&[("total", Value::BigInt(Some(20)))])]])
        .append_query_results([vec![
            row(&[(
                "created_at",
                Value::from(Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap()),
            )]),
            row(&[(
                "created_at",
                Value::from(Utc.with_ymd_and_hms(2023, 6, 3, 9, 0, 0).unwrap()),
            )]),
        ]])
        .append_query_results([vec![
            row(&[
                ("page_url", Value::from("https://docs.example/a")),
                ("page_title", Value::from("A")),
                ("tokens", Value::BigInt(Some(12))),
                ("embedding", Value::from("[1,0,0]")),
            ]),
            row(&[
                ("page_url", Value::from("https://docs.example/b")),
                ("page_title", Value::from("B")),
                ("tokens", Value::BigInt(Some(8))),
                ("embedding", Value::from("[0,1,0]")),
            ]),
        ]])
        .into_connection();

    let dashboard = Dashboard::build(&db, &small_config()).await.unwrap();

    assert!(dashboard.overview_html().contains(r#""values":[14,6]"#));
    assert!(dashboard.embeddings_html().contains("https://docs.example/b"));
}
