//! # Axum Helpers
//!
//! Shared web plumbing for the concierge services.
//!
//! ## Modules
//!
//! - **[`server`]**: common layers, health routes, graceful shutdown
//! - **[`http`]**: CORS policy and security headers
//! - **[`errors`]**: `AppError` and the JSON error body
//! - **[`templates`]**: Handlebars page rendering
//! - **[`session`]**: cookie sessions for the login flow

pub mod errors;
pub mod http;
pub mod server;
pub mod session;
pub mod templates;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    health_router, run_health_checks, shutdown_signal, with_common_layers,
};

pub use http::{CorsPolicy, create_permissive_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use session::{REMEMBER_ME_TTL, Session, create_session_layer, remember_me_expiry};

pub use templates::{HtmlTemplates, script_json};
