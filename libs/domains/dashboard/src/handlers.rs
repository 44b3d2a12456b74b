use axum::{Router, extract::State, response::Html, routing::get};
use std::sync::Arc;

use crate::pages::Dashboard;

/// `/dashboard/` and `/dashboard/embeddings`, serving the pages rendered at
/// startup. The caller applies the login gate.
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/dashboard/", get(overview))
        .route("/dashboard/embeddings", get(embeddings))
        .with_state(dashboard)
}

async fn overview(State(dashboard): State<Arc<Dashboard>>) -> Html<String> {
    Html(dashboard.overview_html().to_string())
}

async fn embeddings(State(dashboard): State<Arc<Dashboard>>) -> Html<String> {
    Html(dashboard.embeddings_html().to_string())
}
