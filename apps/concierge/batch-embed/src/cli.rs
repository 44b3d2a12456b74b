use clap::Parser;
use domain_corpus::{BatchOptions, DEFAULT_CHUNK_SIZE, default_workers};
use domain_embedding::{EmbeddingBackend, EmbeddingConfig, Pooling};
use std::path::PathBuf;

/// Embed every section of a pages corpus into one artifact file
#[derive(Parser, Debug)]
#[command(name = "batch-embed", version)]
pub struct Cli {
    /// Pages corpus, one JSON document per line
    #[arg(long, env = "BATCH_INPUT", default_value = "pages-all.jsonl")]
    pub input: PathBuf,

    /// Artifact path; replaced atomically on success
    #[arg(long, env = "BATCH_OUTPUT", default_value = "page-embeddings.bin")]
    pub output: PathBuf,

    /// onnx, openai or hashing
    #[arg(long, env = "EMBEDDING_BACKEND", default_value = "onnx")]
    pub backend: EmbeddingBackend,

    #[arg(long, env = "EMBEDDING_MODEL", default_value = "msmarco-distilbert-cos-v5")]
    pub model: String,

    /// Directory holding model.onnx and tokenizer.json
    #[arg(long, env = "EMBEDDING_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    #[arg(long, env = "BATCH_MAX_SEQ_LENGTH", default_value_t = 350)]
    pub max_seq_length: usize,

    /// Output size for the hashing and openai backends
    #[arg(long, env = "EMBEDDING_DIMENSION", default_value_t = 768)]
    pub dimension: usize,

    /// cls or mean; defaults to the model directory's pooling module
    #[arg(long, env = "EMBEDDING_POOLING")]
    pub pooling: Option<Pooling>,

    /// L2-normalize vectors; defaults to the model directory's modules
    #[arg(long, env = "EMBEDDING_NORMALIZE")]
    pub normalize: Option<bool>,

    /// Encode workers; defaults to the number of cores
    #[arg(long, env = "BATCH_WORKERS")]
    pub workers: Option<usize>,

    /// Passages per worker task
    #[arg(long, env = "BATCH_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

impl Cli {
    fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(default_workers).max(1)
    }

    /// One single-threaded ONNX session per pool worker.
    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            backend: self.backend,
            model_id: self.model.clone(),
            model_dir: self.model_dir.clone(),
            max_seq_length: self.max_seq_length,
            dimension: self.dimension,
            pooling: self.pooling,
            normalize: self.normalize,
            intra_threads: 1,
            sessions: self.worker_count(),
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            workers: self.worker_count(),
            chunk_size: self.chunk_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["batch-embed", "--model-dir", "/models/distilbert"]).unwrap();

        assert_eq!(cli.input, PathBuf::from("pages-all.jsonl"));
        assert_eq!(cli.output, PathBuf::from("page-embeddings.bin"));
        assert_eq!(cli.chunk_size, DEFAULT_CHUNK_SIZE);

        let config = cli.embedding_config();
        assert_eq!(config.max_seq_length, 350);
        assert_eq!(config.model_id, "msmarco-distilbert-cos-v5");
        assert_eq!(config.model_dir, Some(PathBuf::from("/models/distilbert")));
        assert_eq!(config.pooling, None);
        assert_eq!(config.normalize, None);
        assert!(cli.batch_options().workers >= 1);
    }

    #[test]
    fn test_hashing_backend_and_pool_flags() {
        let cli = Cli::try_parse_from([
            "batch-embed",
            "--backend",
            "hashing",
            "--dimension",
            "64",
            "--workers",
            "3",
            "--chunk-size",
            "8",
        ])
        .unwrap();

        assert_eq!(cli.backend, EmbeddingBackend::Hashing);
        let config = cli.embedding_config();
        assert_eq!(config.dimension, 64);
        assert_eq!(config.sessions, 3);
        assert_eq!(config.intra_threads, 1);
        let options = cli.batch_options();
        assert_eq!(options.workers, 3);
        assert_eq!(options.chunk_size, 8);
    }

    #[test]
    fn test_head_overrides() {
        let cli = Cli::try_parse_from([
            "batch-embed",
            "--model-dir",
            "/models/distilbert",
            "--pooling",
            "cls",
            "--normalize",
            "false",
        ])
        .unwrap();

        let config = cli.embedding_config();
        assert_eq!(config.pooling, Some(Pooling::Cls));
        assert_eq!(config.normalize, Some(false));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Cli::try_parse_from(["batch-embed", "--backend", "word2vec"]).is_err());
    }
}
