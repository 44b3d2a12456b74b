//! Dashboard Domain
//!
//! Analytics over the question log and the embedded corpus, rendered once
//! into static Plotly pages.
//!
//! ```text
//!  queries ──► aggregates ──► figures ──┐
//!     │                                 ├──► pages ──► handlers
//!     └──► section sample ──► tsne ─────┘
//! ```
//!
//! Building a [`Dashboard`] runs every query against the database; the
//! resulting HTML is immutable for the life of the process.

pub mod aggregates;
pub mod config;
pub mod error;
pub mod figures;
pub mod handlers;
pub mod pages;
pub mod queries;
pub mod tsne;

pub use aggregates::{HistogramBin, QuestionMix, cumulative_histogram, question_mix};
pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult};
pub use figures::Figure;
pub use pages::{Dashboard, DashboardData};
pub use queries::{DefaultQuestion, SectionSample};
pub use tsne::TsneProjector;
