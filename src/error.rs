//! Error types for calculator engines and request/report I/O

use thiserror::Error;

/// Result type returned by every engine
pub type CalcResult<T> = Result<T, CalcError>;

/// The only way a calculation can fail: its inputs do not describe a
/// defined result (non-positive denominator, empty duration, a rate that
/// would divide by zero).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput {
        /// Name of the offending input field
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },
}

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Field that caused the rejection
    pub fn field(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { field, .. } => field,
        }
    }
}

/// Failure while reading request batches and configuration, or writing reports
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
