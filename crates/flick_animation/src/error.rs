//! Animation error types

use thiserror::Error;

/// Animation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Remapping from an input range whose ends are equal
    #[error("cannot remap from a degenerate range ({in_min} == {in_max})")]
    DegenerateRange {
        /// Start of the input range
        in_min: f32,
        /// End of the input range
        in_max: f32,
    },

    /// Spring constants out of range
    #[error("invalid spring config: {0}")]
    InvalidConfig(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
