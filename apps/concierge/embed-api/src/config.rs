use axum_helpers::CorsPolicy;
use core_config::{AppInfo, Environment, FromEnv, app_info, server::ServerConfig};
use domain_embedding::EmbeddingConfig;

/// Embedding service configuration, composed from the shared config pieces
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub embedding: EmbeddingConfig,
    pub cors: CorsPolicy,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            embedding: EmbeddingConfig::from_env()?,
            cors: CorsPolicy::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_embedding::EmbeddingBackend;

    #[test]
    fn test_hashing_backend_needs_no_model_dir() {
        temp_env::with_vars(
            [
                ("EMBEDDING_BACKEND", Some("hashing")),
                ("EMBEDDING_MODEL_DIR", None),
                ("EMBEDDING_DIMENSION", Some("384")),
                ("CORS_ALLOWED_ORIGIN", Some("https://concierge.example")),
                ("PORT", Some("8000")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.embedding.backend, EmbeddingBackend::Hashing);
                assert_eq!(config.embedding.dimension, 384);
                assert_eq!(config.server.port, 8000);
                assert!(matches!(config.cors, CorsPolicy::AllowList(ref o) if o.len() == 1));
                assert_eq!(config.app.name, "concierge_embed_api");
            },
        );
    }

    #[test]
    fn test_onnx_backend_requires_model_dir() {
        temp_env::with_vars(
            [
                ("EMBEDDING_BACKEND", Some("onnx")),
                ("EMBEDDING_MODEL_DIR", None::<&str>),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("EMBEDDING_MODEL_DIR"));
            },
        );
    }
}
