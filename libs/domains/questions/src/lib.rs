//! Questions Domain
//!
//! Read-only access to the logged questions and a small data explorer over
//! an export of them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Handlers   │  ← /create-df, /explore/{id}, /explore/{id}/data
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │ DataExplorer │  ← bounded registry of snapshots
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │  Repository  │  ← export of the `questions` table
//! └──────────────┘
//! ```

pub mod error;
pub mod explorer;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod templates;

// Re-export commonly used types
pub use error::{QuestionError, QuestionResult};
pub use explorer::{DataExplorer, Snapshot};
pub use models::{DataPage, PageParams, QuestionRecord};
pub use postgres::PgQuestionRepository;
pub use repository::{InMemoryQuestionRepository, QuestionRepository};
