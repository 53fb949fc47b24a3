//! Range remapping helpers

use crate::error::{AnimationError, Result};

/// Linearly map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Values outside the input range extrapolate. Fails if `in_min == in_max`.
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Result<f32> {
    if in_max == in_min {
        return Err(AnimationError::DegenerateRange { in_min, in_max });
    }
    Ok((value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min)
}

/// Round to two decimal places
pub fn round_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
