//! Composite quality scoring for code change requests.
//!
//! A [`ScoringEngine`] combines four sub-scores (clarity, context,
//! completeness and ticket linkage) into a weighted total, maps it onto a
//! rating band and attaches improvement suggestions. Clarity and suggestions
//! may come from a [`LanguageModel`]; every model failure degrades to the
//! deterministic rules instead of failing the request.

pub mod analyze;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod report;
pub mod semantic;
pub mod suggest;
pub mod telemetry;
pub mod types;

pub use engine::ScoringEngine;
pub use error::{PrScoreError, Result};
pub use model::{LanguageModel, ModelError};
pub use types::config::ScoringConfig;
pub use types::request::{ChangeRequest, FileChange, FileStatus, TestReference, TicketContext};
pub use types::scoring::{Dimension, Rating, ScoreBreakdown, ScoringResult, Thresholds, Weights};
