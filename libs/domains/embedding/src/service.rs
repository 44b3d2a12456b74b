use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::{EmbedResponse, ModelInfo};
use crate::providers::EmbeddingProvider;

/// Check that a model produced a usable vector.
pub fn validate_embedding(vector: &[f32], dimension: usize) -> EmbeddingResult<()> {
    if vector.len() != dimension {
        return Err(EmbeddingError::InvalidOutput(format!(
            "expected {} dimensions, got {}",
            dimension,
            vector.len()
        )));
    }
    if let Some(position) = vector.iter().position(|v| !v.is_finite()) {
        return Err(EmbeddingError::InvalidOutput(format!(
            "non-finite value at position {}",
            position
        )));
    }
    Ok(())
}

/// Turns questions into embeddings with an injected provider
#[derive(Clone)]
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn model_info(&self) -> ModelInfo {
        self.provider.info()
    }

    /// Embed one question. Blank input is rejected before the model is called.
    #[instrument(skip_all, fields(chars = question.chars().count()))]
    pub async fn embed_question(&self, question: &str) -> EmbeddingResult<EmbedResponse> {
        if question.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput("question"));
        }

        let embedding = self.provider.embed(question).await?;
        validate_embedding(&embedding, self.provider.info().dimension)?;

        debug!(dimension = embedding.len(), "Embedded question");
        Ok(EmbedResponse { embedding })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockEmbeddingProvider;

    fn info(dimension: usize) -> ModelInfo {
        ModelInfo {
            model_id: "test-model".into(),
            dimension,
            max_seq_length: 256,
        }
    }

    #[tokio::test]
    async fn test_blank_question_never_reaches_model() {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_embed().never();

        let service = EmbeddingService::new(Arc::new(mock));

        for question in ["", "   ", "\n\t"] {
            let err = service.embed_question(question).await.unwrap_err();
            assert!(matches!(err, EmbeddingError::EmptyInput("question")));
        }
    }

    #[tokio::test]
    async fn test_returns_model_vector() {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_info().returning(|| info(3));
        mock.expect_embed()
            .with(mockall::predicate::eq("What is the refund policy?"))
            .times(1)
            .returning(|_| Ok(vec![0.1, 0.2, 0.3]));

        let service = EmbeddingService::new(Arc::new(mock));
        let response = service
            .embed_question("What is the refund policy?")
            .await
            .unwrap();

        assert_eq!(response.embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_embed()
            .returning(|_| Err(EmbeddingError::Model("runtime unavailable".into())));

        let service = EmbeddingService::new(Arc::new(mock));
        let err = service.embed_question("hello").await.unwrap_err();

        assert!(matches!(err, EmbeddingError::Model(_)));
    }

    #[tokio::test]
    async fn test_wrong_dimension_rejected() {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_info().returning(|| info(4));
        mock.expect_embed().returning(|_| Ok(vec![0.1, 0.2]));

        let service = EmbeddingService::new(Arc::new(mock));
        let err = service.embed_question("hello").await.unwrap_err();

        assert!(matches!(err, EmbeddingError::InvalidOutput(_)));
    }

    #[test]
    fn test_validate_embedding_rejects_non_finite() {
        assert!(validate_embedding(&[0.0, 1.0], 2).is_ok());
        assert!(validate_embedding(&[f32::NAN, 1.0], 2).is_err());
        assert!(validate_embedding(&[0.0, f32::INFINITY], 2).is_err());
    }
}
