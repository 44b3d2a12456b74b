use domain_embedding::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid page document at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Embedding failed for chunk {chunk}: {source}")]
    Embedding {
        chunk: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("Invalid embedding for passage {index}: {source}")]
    InvalidVector {
        index: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("Worker {worker} panicked: {message}")]
    WorkerPanic { worker: usize, message: String },

    #[error("Encode pool is closed")]
    PoolClosed,

    #[error("Invalid pool settings: {0}")]
    InvalidPool(String),

    #[error("Artifact invariant violated: {0}")]
    Invariant(String),

    #[error("Artifact encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

pub type CorpusResult<T> = Result<T, CorpusError>;
