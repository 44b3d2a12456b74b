//! Server bootstrap: common layers, health routes and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, health_router, with_common_layers};
//! use core_config::app_info;
//!
//! let app = with_common_layers(routes.merge(health_router(app_info!())), &cors);
//! create_production_app(app, &config.server, async move {
//!     db.close().await.ok();
//! })
//! .await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_production_app, with_common_layers};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
