//! Concierge web front end: login-gated question explorer and dashboards.

pub mod app;
pub mod config;
pub mod ready;

pub use app::{INDEX_HTML, WebState, build_router};
pub use config::Config;
