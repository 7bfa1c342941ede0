//! Error types for Flagfall

use thiserror::Error;

/// Core clock errors
///
/// The engine itself never fails; these surface only from strict
/// constructors and parsers used at the edges.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("Initial time must be positive")]
    NonPositiveInitial,

    #[error("Invalid number of seconds: {0}")]
    InvalidSeconds(f64),

    #[error("Unknown side: {0:?}")]
    UnknownSide(String),
}

/// Result type for clock operations
pub type ClockResult<T> = Result<T, ClockError>;
