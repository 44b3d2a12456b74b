use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, FromEnv, env_optional};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Cross-origin policy for a service.
///
/// Read from `CORS_ALLOWED_ORIGIN`: unset or `*` allows every origin, otherwise
/// the value is a comma-separated list of origins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsPolicy {
    AllowAny,
    AllowList(Vec<HeaderValue>),
}

impl CorsPolicy {
    pub fn parse(value: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(Self::AllowAny);
        };
        if raw == "*" {
            return Ok(Self::AllowAny);
        }

        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>().map_err(|e| ConfigError::ParseError {
                    key: "CORS_ALLOWED_ORIGIN".to_string(),
                    details: format!("{s}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if origins.is_empty() {
            return Ok(Self::AllowAny);
        }
        Ok(Self::AllowList(origins))
    }

    pub fn layer(&self) -> CorsLayer {
        match self {
            CorsPolicy::AllowAny => {
                warn!("CORS allows any origin");
                create_permissive_cors_layer()
            }
            CorsPolicy::AllowList(origins) => {
                info!(count = origins.len(), "CORS restricted to configured origins");
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins.clone()))
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
                    .max_age(Duration::from_secs(3600))
            }
        }
    }
}

impl FromEnv for CorsPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        Self::parse(env_optional("CORS_ALLOWED_ORIGIN").as_deref())
    }
}

/// Allows any origin, method and header. Credentials are not allowed.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
