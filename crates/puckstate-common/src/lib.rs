//! Puckstate common types, errors, and settings.
//!
//! This crate provides foundational types shared across puckstate modules:
//! - Game records and the chronologically ordered game sequence
//! - The fixed performance-state label vocabulary
//! - Common error types with stable codes
//! - Output format specifications
//! - Model settings and validation

pub mod error;
pub mod output;
pub mod record;
pub mod settings;

pub use error::{Error, Result, StructuredError};
pub use output::OutputFormat;
pub use record::{AnnotatedGame, Feature, GameRecord, GameSequence, StateLabel};
pub use settings::{CovarianceKind, HmmSettings};
