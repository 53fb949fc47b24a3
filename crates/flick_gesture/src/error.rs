//! Gesture error types

use thiserror::Error;

/// Gesture input errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// Throttle parameters out of range
    #[error(
        "invalid throttle (step {step}, threshold {threshold}): both must be greater than 0 and step cannot be greater than threshold"
    )]
    InvalidThrottle {
        /// Requested step
        step: u32,
        /// Requested threshold
        threshold: u32,
    },
}

/// Result type for gesture operations
pub type Result<T> = std::result::Result<T, GestureError>;
