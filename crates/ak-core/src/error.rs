//! Framework error types.
//!
//! Sub-crates define their own error enums; `CoreError` covers what is shared
//! between them (parsing of core enums, stochastics validation).

use thiserror::Error;

/// A precondition violation in the stochastics facade.
///
/// Returned from the sampling call itself; parameters are never clamped into
/// a valid range behind the caller's back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("{what} must be non-negative, got {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("{what} must be strictly positive, got {value}")]
    NotPositive { what: &'static str, value: f64 },

    #[error("{what} must be finite, got {value}")]
    NotFinite { what: &'static str, value: f64 },

    #[error("range [{min}, {max}] is wider than f64 can represent")]
    SpanOverflow { min: f64, max: f64 },

    #[error("probability {0} is outside [0, 1]")]
    Probability(f64),

    #[error("no sample within [{min}, {max}] after {attempts} draws")]
    TruncationExhausted { min: f64, max: f64, attempts: u32 },
}

/// The top-level error type for `ak-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `ak-core`.
pub type CoreResult<T> = Result<T, CoreError>;
