//! Error types for puckstate.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! No error is retried automatically: the pipeline is deterministic given a
//! fixed seed and input, so a retry would reproduce the same failure. Every
//! error names the stage and the constraint that was violated so the caller
//! can correct the input or configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for puckstate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed input file: missing columns, unparseable dates or cells.
    InputFormat,
    /// Well-formed input that the model cannot use (zero variance, NaN).
    Input,
    /// Model fitting failures (too few games, singular covariance).
    Fit,
    /// Settings and vocabulary constraint violations.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::InputFormat => write!(f, "input_format"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Fit => write!(f, "fit"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for puckstate.
#[derive(Error, Debug)]
pub enum Error {
    // Input format errors (10-19): reported before any modeling runs
    #[error("required column missing: {column}")]
    MissingColumn { column: String },

    #[error("unparseable date in row {row}: {value:?}")]
    UnparseableDate { row: usize, value: String },

    #[error("malformed CSV: {0}")]
    MalformedCsv(String),

    #[error("input contains no game rows")]
    EmptyInput,

    // Invalid input errors (20-29): reported before fitting
    #[error("feature column {column} has zero variance; cannot standardize")]
    ZeroVariance { column: String },

    #[error("non-numeric value in row {row}, column {column}")]
    NonNumeric { row: usize, column: String },

    #[error("non-finite value in row {row}, column {column}")]
    NonFinite { row: usize, column: String },

    // Fit errors (30-39): abort the run, no partial state assignment
    #[error("{states} hidden states requested but only {games} games provided")]
    TooFewGames { games: usize, states: usize },

    #[error("singular covariance for state {state}; fit aborted")]
    SingularCovariance { state: usize },

    #[error("non-finite log-likelihood at EM iteration {iteration}; fit aborted")]
    NumericalDivergence { iteration: usize },

    // Config errors (40-49)
    #[error("{states} states requested but the label vocabulary has only {vocabulary} names")]
    VocabularyExceeded { states: usize, vocabulary: usize },

    #[error("no coaching note for label {label:?}")]
    MissingAnnotation { label: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input format errors
    /// - 20-29: Invalid input errors
    /// - 30-39: Fit errors
    /// - 40-49: Config errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::MissingColumn { .. } => 10,
            Error::UnparseableDate { .. } => 11,
            Error::MalformedCsv(_) => 12,
            Error::EmptyInput => 13,
            Error::ZeroVariance { .. } => 20,
            Error::NonNumeric { .. } => 21,
            Error::NonFinite { .. } => 22,
            Error::TooFewGames { .. } => 30,
            Error::SingularCovariance { .. } => 31,
            Error::NumericalDivergence { .. } => 32,
            Error::VocabularyExceeded { .. } => 40,
            Error::MissingAnnotation { .. } => 41,
            Error::InvalidSettings(_) => 42,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MissingColumn { .. }
            | Error::UnparseableDate { .. }
            | Error::MalformedCsv(_)
            | Error::EmptyInput => ErrorCategory::InputFormat,

            Error::ZeroVariance { .. } | Error::NonNumeric { .. } | Error::NonFinite { .. } => {
                ErrorCategory::Input
            }

            Error::TooFewGames { .. }
            | Error::SingularCovariance { .. }
            | Error::NumericalDivergence { .. } => ErrorCategory::Fit,

            Error::VocabularyExceeded { .. }
            | Error::MissingAnnotation { .. }
            | Error::InvalidSettings(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller.
    ///
    /// Fitting is deterministic, so "recoverable" means the user can change
    /// the input file or settings, not that a retry would help.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Input format: fix the CSV and re-run
            Error::MissingColumn { .. } => true,
            Error::UnparseableDate { .. } => true,
            Error::MalformedCsv(_) => true,
            Error::EmptyInput => true,

            // Invalid input: fix the data
            Error::ZeroVariance { .. } => true,
            Error::NonNumeric { .. } => true,
            Error::NonFinite { .. } => true,

            // Fit: add games or reduce the state count
            Error::TooFewGames { .. } => true,
            Error::SingularCovariance { .. } => true,
            Error::NumericalDivergence { .. } => false,

            // Config: adjust settings
            Error::VocabularyExceeded { .. } => true,
            Error::MissingAnnotation { .. } => false, // vocabulary bug
            Error::InvalidSettings(_) => true,

            // I/O: often transient
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::MissingColumn { .. } => "Missing Column",
            Error::UnparseableDate { .. } => "Unparseable Date",
            Error::MalformedCsv(_) => "Malformed CSV",
            Error::EmptyInput => "Empty Input",

            Error::ZeroVariance { .. } => "Zero-Variance Feature",
            Error::NonNumeric { .. } => "Non-Numeric Value",
            Error::NonFinite { .. } => "Non-Finite Value",

            Error::TooFewGames { .. } => "Too Few Games",
            Error::SingularCovariance { .. } => "Singular Covariance",
            Error::NumericalDivergence { .. } => "Numerical Divergence",

            Error::VocabularyExceeded { .. } => "Too Many States",
            Error::MissingAnnotation { .. } => "Missing Coaching Note",
            Error::InvalidSettings(_) => "Invalid Settings",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Serialization Error",
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::MissingColumn { .. } => {
                "Ensure the CSV header has GameDate, Opponent, Venue, GoalsFor, GoalsAgainst, ShotsFor, ShotsAgainst, PenaltyMinutes, and FaceoffWinPct."
            }
            Error::UnparseableDate { .. } => {
                "Use ISO dates (YYYY-MM-DD) in the GameDate column."
            }
            Error::MalformedCsv(_) => {
                "Check that every row has the same number of fields as the header."
            }
            Error::EmptyInput => "Add at least as many game rows as hidden states.",

            Error::ZeroVariance { .. } => {
                "A feature is constant across all games. Remove the column or add games where it varies."
            }
            Error::NonNumeric { .. } => {
                "Feature columns must contain numbers only. Fix the offending cell."
            }
            Error::NonFinite { .. } => {
                "Feature columns must be finite. Remove NaN or infinite values."
            }

            Error::TooFewGames { .. } => {
                "Add more games or lower --states; the model needs at least one game per state."
            }
            Error::SingularCovariance { .. } => {
                "A state collapsed onto too few games. Lower --states or provide more varied data."
            }
            Error::NumericalDivergence { .. } => {
                "The fit diverged. This is an internal numerical issue; please report it with the input file."
            }

            Error::VocabularyExceeded { .. } => {
                "The label vocabulary has 5 names; use --states between 2 and 5."
            }
            Error::MissingAnnotation { .. } => {
                "Internal vocabulary inconsistency; please report this as a bug."
            }
            Error::InvalidSettings(_) => {
                "Check --states (2-5), --max-iters (>= 1), and tolerance (> 0)."
            }

            Error::Io(_) => "Check that the input path exists and is readable.",
            Error::Json(_) => "Internal serialization failure; please report this as a bug.",
        }
    }
}

/// Structured error response for JSON output.
///
/// Used by machine consumers for parseable error reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is recoverable by changing input or settings.
    pub recoverable: bool,

    /// Additional structured context (row, column, state index).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::MissingColumn { column } => {
                context.insert("column".to_string(), serde_json::json!(column));
            }
            Error::UnparseableDate { row, value } => {
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("value".to_string(), serde_json::json!(value));
            }
            Error::ZeroVariance { column } => {
                context.insert("column".to_string(), serde_json::json!(column));
            }
            Error::NonNumeric { row, column } | Error::NonFinite { row, column } => {
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("column".to_string(), serde_json::json!(column));
            }
            Error::TooFewGames { games, states } => {
                context.insert("games".to_string(), serde_json::json!(games));
                context.insert("states".to_string(), serde_json::json!(states));
            }
            Error::SingularCovariance { state } => {
                context.insert("state".to_string(), serde_json::json!(state));
            }
            Error::NumericalDivergence { iteration } => {
                context.insert("iteration".to_string(), serde_json::json!(iteration));
            }
            Error::VocabularyExceeded { states, vocabulary } => {
                context.insert("states".to_string(), serde_json::json!(states));
                context.insert("vocabulary".to_string(), serde_json::json!(vocabulary));
            }
            Error::MissingAnnotation { label } => {
                context.insert("label".to_string(), serde_json::json!(label));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
