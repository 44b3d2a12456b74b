//! Embedding Domain
//!
//! Turns a free-text question into a dense vector using a pretrained
//! sentence-embedding model.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │     Handlers     │  ← POST / {"question"} → {"embedding"}
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ EmbeddingService │  ← blank-input check, output validation
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │EmbeddingProvider │  ← trait, injected as Arc<dyn _>
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ OnnxProvider     │
//! │ OpenAIProvider   │
//! │ HashingProvider  │
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_embedding::{EmbeddingConfig, EmbeddingService, build_provider, handlers};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EmbeddingConfig::from_env()?;
//! let provider = build_provider(&config).await?;
//! let router = handlers::router(EmbeddingService::new(provider));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod service;

pub use config::{EmbeddingBackend, EmbeddingConfig, build_provider};
pub use error::{EmbeddingError, EmbeddingResult};
pub use models::{EmbedRequest, EmbedResponse, ModelInfo};
pub use providers::{
    EmbeddingProvider, HashingProvider, OnnxConfig, OnnxProvider, OpenAIConfig, OpenAIProvider,
    Pooling, SentenceHead, l2_normalize,
};
pub use service::{EmbeddingService, validate_embedding};
