use core_config::{
    ConfigError, FromEnv, env_optional, env_or_default, env_parse, env_parse_optional,
};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::ModelInfo;
use crate::providers::{
    EmbeddingProvider, HashingProvider, OnnxConfig, OnnxProvider, OpenAIConfig, OpenAIProvider,
    Pooling,
};

pub const DEFAULT_MODEL: &str = "multi-qa-mpnet-base-dot-v1";
pub const DEFAULT_MAX_SEQ_LENGTH: usize = 256;
pub const DEFAULT_DIMENSION: usize = 768;

/// Which embedding capability backs a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    #[default]
    Onnx,
    OpenAi,
    Hashing,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "onnx" => Ok(Self::Onnx),
            "openai" => Ok(Self::OpenAi),
            "hashing" => Ok(Self::Hashing),
            other => Err(format!(
                "unknown embedding backend '{}', expected onnx, openai or hashing",
                other
            )),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Onnx => "onnx",
            Self::OpenAi => "openai",
            Self::Hashing => "hashing",
        };
        f.write_str(name)
    }
}

/// Provider selection and model parameters.
///
/// | variable | default |
/// |---|---|
/// | `EMBEDDING_BACKEND` | `onnx` |
/// | `EMBEDDING_MODEL` | `multi-qa-mpnet-base-dot-v1` |
/// | `EMBEDDING_MODEL_DIR` | required for `onnx` |
/// | `EMBEDDING_MAX_SEQ_LENGTH` | 256 |
/// | `EMBEDDING_DIMENSION` | 768 |
/// | `EMBEDDING_POOLING` | from the model directory (`cls` or `mean`) |
/// | `EMBEDDING_NORMALIZE` | from the model directory |
/// | `EMBEDDING_INTRA_THREADS` | 4 |
/// | `EMBEDDING_SESSIONS` | 1 |
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model_id: String,
    pub model_dir: Option<PathBuf>,
    pub max_seq_length: usize,
    pub dimension: usize,
    pub pooling: Option<Pooling>,
    pub normalize: Option<bool>,
    pub intra_threads: usize,
    pub sessions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model_id: DEFAULT_MODEL.to_string(),
            model_dir: None,
            max_seq_length: DEFAULT_MAX_SEQ_LENGTH,
            dimension: DEFAULT_DIMENSION,
            pooling: None,
            normalize: None,
            intra_threads: 4,
            sessions: 1,
        }
    }
}

impl FromEnv for EmbeddingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend_raw = env_or_default("EMBEDDING_BACKEND", "onnx");
        let backend = backend_raw
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "EMBEDDING_BACKEND".to_string(),
                details,
            })?;

        let config = Self {
            backend,
            model_id: env_or_default("EMBEDDING_MODEL", DEFAULT_MODEL),
            model_dir: env_optional("EMBEDDING_MODEL_DIR").map(PathBuf::from),
            max_seq_length: env_parse("EMBEDDING_MAX_SEQ_LENGTH", "256")?,
            dimension: env_parse("EMBEDDING_DIMENSION", "768")?,
            pooling: env_parse_optional("EMBEDDING_POOLING")?,
            normalize: env_parse_optional("EMBEDDING_NORMALIZE")?,
            intra_threads: env_parse("EMBEDDING_INTRA_THREADS", "4")?,
            sessions: env_parse("EMBEDDING_SESSIONS", "1")?,
        };

        if config.backend == EmbeddingBackend::Onnx && config.model_dir.is_none() {
            return Err(ConfigError::MissingEnvVar("EMBEDDING_MODEL_DIR".to_string()));
        }

        Ok(config)
    }
}

/// Construct the configured provider.
///
/// ONNX models are loaded on the blocking pool; the OpenAI backend reads its
/// credentials from the environment at this point.
pub async fn build_provider(config: &EmbeddingConfig) -> EmbeddingResult<Arc<dyn EmbeddingProvider>> {
    info!(backend = %config.backend, model = %config.model_id, "Initializing embedding provider");

    let provider: Arc<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::Hashing => Arc::new(HashingProvider::new(
            config.dimension,
            config.max_seq_length,
        )?),
        EmbeddingBackend::OpenAi => Arc::new(OpenAIProvider::new(
            OpenAIConfig::from_env()?,
            ModelInfo {
                model_id: config.model_id.clone(),
                dimension: config.dimension,
                max_seq_length: config.max_seq_length,
            },
        )),
        EmbeddingBackend::Onnx => {
            let model_dir = config.model_dir.clone().ok_or_else(|| {
                EmbeddingError::Config("EMBEDDING_MODEL_DIR is required for onnx".to_string())
            })?;
            let onnx = OnnxConfig {
                model_dir,
                model_id: config.model_id.clone(),
                max_seq_length: config.max_seq_length,
                pooling: config.pooling,
                normalize: config.normalize,
                intra_threads: config.intra_threads,
                sessions: config.sessions,
            };
            let provider = tokio::task::spawn_blocking(move || OnnxProvider::load(&onnx)).await??;
            Arc::new(provider)
        }
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("onnx".parse::<EmbeddingBackend>(), Ok(EmbeddingBackend::Onnx));
        assert_eq!("OpenAI".parse::<EmbeddingBackend>(), Ok(EmbeddingBackend::OpenAi));
        assert_eq!(" hashing ".parse::<EmbeddingBackend>(), Ok(EmbeddingBackend::Hashing));
        assert!("sbert".parse::<EmbeddingBackend>().is_err());
    }

    #[test]
    fn test_from_env_defaults_for_hashing() {
        temp_env::with_vars(
            [
                ("EMBEDDING_BACKEND", Some("hashing")),
                ("EMBEDDING_MODEL", None),
                ("EMBEDDING_MODEL_DIR", None),
                ("EMBEDDING_MAX_SEQ_LENGTH", None),
                ("EMBEDDING_DIMENSION", None),
                ("EMBEDDING_POOLING", None),
                ("EMBEDDING_NORMALIZE", None),
                ("EMBEDDING_INTRA_THREADS", None),
                ("EMBEDDING_SESSIONS", None),
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.backend, EmbeddingBackend::Hashing);
                assert_eq!(config.model_id, DEFAULT_MODEL);
                assert_eq!(config.max_seq_length, 256);
                assert_eq!(config.dimension, 768);
                assert_eq!(config.pooling, None);
                assert_eq!(config.normalize, None);
                assert_eq!(config.sessions, 1);
                assert!(config.model_dir.is_none());
            },
        );
    }

    #[test]
    fn test_onnx_requires_model_dir() {
        temp_env::with_vars(
            [
                ("EMBEDDING_BACKEND", None::<&str>),
                ("EMBEDDING_MODEL_DIR", None),
            ],
            || {
                let err = EmbeddingConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "EMBEDDING_MODEL_DIR"));
            },
        );
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("EMBEDDING_BACKEND", Some("onnx")),
                ("EMBEDDING_MODEL", Some("multi-qa-distilbert-cos-v1")),
                ("EMBEDDING_MODEL_DIR", Some("/models/distilbert")),
                ("EMBEDDING_MAX_SEQ_LENGTH", Some("512")),
                ("EMBEDDING_POOLING", Some("mean")),
                ("EMBEDDING_NORMALIZE", Some("true")),
                ("EMBEDDING_SESSIONS", Some("3")),
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.model_id, "multi-qa-distilbert-cos-v1");
                assert_eq!(config.model_dir, Some(PathBuf::from("/models/distilbert")));
                assert_eq!(config.max_seq_length, 512);
                assert_eq!(config.pooling, Some(Pooling::Mean));
                assert_eq!(config.normalize, Some(true));
                assert_eq!(config.sessions, 3);
            },
        );
    }

    #[test]
    fn test_invalid_backend_is_parse_error() {
        temp_env::with_var("EMBEDDING_BACKEND", Some("word2vec"), || {
            assert!(matches!(
                EmbeddingConfig::from_env(),
                Err(ConfigError::ParseError { .. })
            ));
        });
    }

    #[test]
    fn test_invalid_pooling_is_parse_error() {
        temp_env::with_vars(
            [
                ("EMBEDDING_BACKEND", Some("hashing")),
                ("EMBEDDING_POOLING", Some("max")),
            ],
            || {
                assert!(matches!(
                    EmbeddingConfig::from_env(),
                    Err(ConfigError::ParseError { key, .. }) if key == "EMBEDDING_POOLING"
                ));
            },
        );
    }

    #[tokio::test]
    async fn test_build_hashing_provider() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Hashing,
            dimension: 32,
            ..Default::default()
        };
        let provider = build_provider(&config).await.unwrap();
        assert_eq!(provider.info().dimension, 32);
        assert_eq!(provider.info().model_id, "feature-hashing-32");
    }

    #[tokio::test]
    async fn test_build_onnx_without_files_fails() {
        let config = EmbeddingConfig {
            model_dir: Some(PathBuf::from("/nonexistent/model")),
            ..Default::default()
        };
        assert!(matches!(
            build_provider(&config).await,
            Err(EmbeddingError::Config(_))
        ));
    }
}
