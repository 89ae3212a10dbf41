//! Exit codes for the puckstate CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing. They are a stable contract for automation.
//!
//! Exit code ranges:
//! - 0: clean run
//! - 10-19: user/input errors (recoverable by fixing input or settings)
//! - 20-29: internal errors (bugs, should be reported)

use puckstate_common::{error::ErrorCategory, Error};

/// Exit codes for puckstate operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Clean = 0,

    /// Invalid arguments.
    ArgsError = 10,

    /// Malformed input file (missing columns, bad dates, bad cells).
    InputFormatError = 11,

    /// Well-formed input the model cannot use (zero variance, NaN).
    InvalidInputError = 12,

    /// Model fitting failed (too few games, singular covariance).
    FitError = 13,

    /// Settings or vocabulary constraint violated.
    ConfigError = 14,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// I/O error.
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a pipeline error onto its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::InputFormat => ExitCode::InputFormatError,
            ErrorCategory::Input => ExitCode::InvalidInputError,
            ErrorCategory::Fit => ExitCode::FitError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}
