//! Deterministic feature-hashing embedder.
//!
//! No model files and no network: each lowercase word is hashed into one of
//! `dimension` buckets with a signed weight, and the result is L2-normalized.
//! Texts sharing words land close together, which is enough for local
//! development and for exercising the HTTP and batch paths in tests.

use async_trait::async_trait;

use super::provider::{EmbeddingProvider, l2_normalize};
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::ModelInfo;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone)]
pub struct HashingProvider {
    model_id: String,
    dimension: usize,
    max_seq_length: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize, max_seq_length: usize) -> EmbeddingResult<Self> {
        if dimension == 0 {
            return Err(EmbeddingError::Config(
                "hashing dimension must be positive".to_string(),
            ));
        }
        Ok(Self {
            model_id: format!("feature-hashing-{}", dimension),
            dimension,
            max_seq_length,
        })
    }

    /// Embed synchronously; used directly by the batch workers.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .take(self.max_seq_length);

        for token in tokens {
            let hash = fnv1a(token.to_lowercase().as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.model_id.clone(),
            dimension: self.dimension,
            max_seq_length: self.max_seq_length,
        }
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }
}
