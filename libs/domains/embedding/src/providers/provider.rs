use async_trait::async_trait;

use crate::error::EmbeddingResult;
use crate::models::ModelInfo;

/// A pretrained text-embedding capability.
///
/// Implementations must return one vector per input, in input order, each of
/// length `info().dimension`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identity and output dimension
    fn info(&self) -> ModelInfo;

    /// Embed a single text
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Embed several texts in one call
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>>;
}

/// Scale `vector` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
}
