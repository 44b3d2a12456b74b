//! Users Domain
//!
//! Username/password accounts and the session-based login flow for the web
//! front end.
//!
//! # Features
//!
//! - Registration with form validation
//! - Password hashing with Argon2
//! - Session login with optional "remember me"
//! - `require_login` gate for protected routes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /login/, /logout/, /register/ (HTML forms)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, forms, session identity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! # fn example() -> Result<(), domain_users::UserError> {
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service)?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod templates;

// Re-export commonly used types
pub use auth::{current_user, require_login, safe_next};
pub use error::{UserError, UserResult};
pub use models::{LoginForm, RegisterForm, SessionUser, User};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
