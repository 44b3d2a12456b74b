use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::get,
};
use axum_helpers::{AppError, HtmlTemplates};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{QuestionError, QuestionResult};
use crate::explorer::DataExplorer;
use crate::models::{DataPage, PageParams, QuestionRecord};
use crate::templates::{EXPLORER_TEMPLATE, ExplorerView, explorer_templates};

/// Application state for the explorer routes
pub struct ExplorerState {
    pub explorer: Arc<DataExplorer>,
    /// Records exported at startup; `/create-df` opens a snapshot of these
    pub export: Arc<Vec<QuestionRecord>>,
    pub templates: HtmlTemplates,
}

/// OpenAPI documentation for the explorer data endpoint
#[derive(OpenApi)]
#[openapi(
    paths(explore_data),
    components(schemas(DataPage, QuestionRecord)),
    tags(
        (name = "explorer", description = "Question log exploration")
    )
)]
pub struct ApiDoc;

/// `/create-df`, `/explore/{data_id}`, `/explore/{data_id}/data` and the
/// explorer's OpenAPI document.
///
/// Nothing here checks the session; the caller wraps the router in the
/// login gate.
pub fn router(
    explorer: Arc<DataExplorer>,
    export: Arc<Vec<QuestionRecord>>,
) -> QuestionResult<Router> {
    let templates = explorer_templates()
        .map_err(|e| QuestionError::Internal(format!("explorer templates: {}", e)))?;
    let state = Arc::new(ExplorerState {
        explorer,
        export,
        templates,
    });

    Ok(Router::new()
        .route("/create-df", get(create_df))
        .route("/explore/{data_id}", get(explore_page))
        .route("/explore/{data_id}/data", get(explore_data))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state))
}

/// Ids that do not parse are reported like unknown ones.
fn parse_data_id(raw: &str) -> QuestionResult<Uuid> {
    raw.parse()
        .map_err(|_| QuestionError::DatasetNotFound(raw.to_string()))
}

async fn create_df(State(state): State<Arc<ExplorerState>>) -> impl IntoResponse {
    let data_id = state.explorer.register(Arc::clone(&state.export)).await;
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("/explore/{}", data_id))],
    )
}

async fn explore_page(
    State(state): State<Arc<ExplorerState>>,
    Path(data_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, AppError> {
    let page = state.explorer.page(parse_data_id(&data_id)?, params).await?;
    state
        .templates
        .render(EXPLORER_TEMPLATE, &ExplorerView::new(&page))
}

/// Rows of a registered dataset as JSON
#[utoipa::path(
    get,
    path = "/explore/{data_id}/data",
    tag = "explorer",
    params(
        ("data_id" = String, Path, description = "Dataset id returned by /create-df"),
        PageParams
    ),
    responses(
        (status = 200, description = "Window of rows", body = DataPage),
        (status = 404, description = "Unknown dataset")
    )
)]
async fn explore_data(
    State(state): State<Arc<ExplorerState>>,
    Path(data_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<DataPage>, AppError> {
    let page = state.explorer.page(parse_data_id(&data_id)?, params).await?;
    Ok(Json(page))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
