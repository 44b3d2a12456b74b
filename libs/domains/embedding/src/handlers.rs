use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};
use axum_helpers::{AppError, ErrorResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{EmbedRequest, EmbedResponse, ModelInfo};
use crate::service::EmbeddingService;

pub const INDEX_TEXT: &str = "Question embedding service. POST {\"question\": \"...\"} to / to embed it.";

/// OpenAPI documentation for the embedding endpoint
#[derive(OpenApi)]
#[openapi(
    paths(index, embed_question, model_info),
    components(schemas(EmbedRequest, EmbedResponse, ModelInfo, ErrorResponse)),
    tags(
        (name = "embedding", description = "Question embedding")
    )
)]
pub struct ApiDoc;

/// Create the embedding router: `GET /`, `POST /`, `GET /model`
pub fn router(service: EmbeddingService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(index).post(embed_question))
        .route("/model", get(model_info))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(shared_service)
}

/// Plain index text
#[utoipa::path(
    get,
    path = "/",
    tag = "embedding",
    responses(
        (status = 200, description = "Service description", body = String, content_type = "text/plain")
    )
)]
async fn index() -> &'static str {
    INDEX_TEXT
}

/// Embed a question
///
/// Extraction failures are reported as 400 regardless of the rejection kind.
#[utoipa::path(
    post,
    path = "/",
    tag = "embedding",
    request_body = EmbedRequest,
    responses(
        (status = 200, description = "Embedding of the question", body = EmbedResponse),
        (status = 400, description = "Malformed body or empty question", body = ErrorResponse),
        (status = 500, description = "Model failure", body = ErrorResponse)
    )
)]
async fn embed_question(
    State(service): State<Arc<EmbeddingService>>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let response = service.embed_question(&request.question).await?;
    Ok(Json(response))
}

/// Describe the loaded model
#[utoipa::path(
    get,
    path = "/model",
    tag = "embedding",
    responses(
        (status = 200, description = "Model identity", body = ModelInfo)
    )
)]
async fn model_info(State(service): State<Arc<EmbeddingService>>) -> Json<ModelInfo> {
    Json(service.model_info())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
