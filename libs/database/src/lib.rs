//! PostgreSQL access for the concierge services.
//!
//! One [`DatabaseConnection`](sea_orm::DatabaseConnection) is opened per process at
//! start-up and closed during graceful shutdown. Connection failures at start-up
//! are fatal; there is no retry loop.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let db = postgres::connect_from_config(PostgresConfig::from_env()?).await?;
//! postgres::ensure_vector_extension(&db).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
