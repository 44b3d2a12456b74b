//! Corpus Domain
//!
//! The offline half of the system: a pages corpus is flattened into
//! sections, each section's content becomes a passage, passages are embedded
//! on a scoped worker pool and the result is persisted as one artifact.
//!
//! ```text
//! pages.jsonl ─► read_corpus ─► passages ─► EncodePool::encode ─► EmbeddingArtifact::write_to
//! ```
//!
//! [`run_batch`] strings the steps together; any failure aborts before the
//! artifact is written.

pub mod artifact;
pub mod error;
pub mod models;
pub mod pool;
pub mod reader;

pub use artifact::EmbeddingArtifact;
pub use error::{CorpusError, CorpusResult};
pub use models::{PageDocument, PageMeta, SectionRecord};
pub use pool::{DEFAULT_CHUNK_SIZE, EncodePool, default_workers};
pub use reader::{normalize_passage, passages, read_corpus};

use domain_embedding::{EmbeddingProvider, validate_embedding};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub workers: usize,
    pub chunk_size: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Read `input`, embed every passage and write the artifact to `output`.
///
/// Blocking; call it off the async workers. Every vector must match the
/// provider's declared dimension and be finite. The pool is released on every
/// path out of this function.
pub fn run_batch(
    input: &Path,
    output: &Path,
    provider: Arc<dyn EmbeddingProvider>,
    runtime: Handle,
    options: &BatchOptions,
) -> CorpusResult<EmbeddingArtifact> {
    let sections = read_corpus(BufReader::new(File::open(input)?))?;
    let passages = passages(&sections);
    info!(sections = sections.len(), "Passages: {}", passages.len());

    let dimension = provider.info().dimension;
    let pool = EncodePool::start(provider, options.workers, options.chunk_size, runtime)?;
    let embeddings = pool.encode(&passages)?;
    pool.stop()?;

    for (index, vector) in embeddings.iter().enumerate() {
        validate_embedding(vector, dimension)
            .map_err(|source| CorpusError::InvalidVector { index, source })?;
    }

    let artifact = EmbeddingArtifact::new(passages, embeddings)?;
    info!(
        passages = artifact.len(),
        dimension = artifact.dimension().unwrap_or(0),
        "Corpus embeddings created"
    );

    artifact.write_to(output)?;
    Ok(artifact)
}
