use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmbedRequest {
    /// Free-text question to embed
    #[schema(example = "What is the refund policy?")]
    pub question: String,
}

/// Response of `POST /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmbedResponse {
    /// Dense vector; its length is the model's dimension
    pub embedding: Vec<f32>,
}

/// Identity of the model behind a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModelInfo {
    #[schema(example = "multi-qa-mpnet-base-dot-v1")]
    pub model_id: String,
    #[schema(example = 768)]
    pub dimension: usize,
    /// Inputs longer than this many tokens are truncated
    pub max_seq_length: usize,
}
