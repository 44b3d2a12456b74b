mod hashing;
mod onnx;
mod openai;
mod pooling;
mod provider;

pub use hashing::HashingProvider;
pub use onnx::{MODEL_FILE, OnnxConfig, OnnxProvider, TOKENIZER_FILE};
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use pooling::{MODULES_FILE, POOLING_CONFIG_FILE, Pooling, SentenceHead};
pub use provider::{EmbeddingProvider, l2_normalize};

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
