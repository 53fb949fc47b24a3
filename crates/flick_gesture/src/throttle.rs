//! Frame-count throttle for listener dispatch

use crate::error::{GestureError, Result};

/// Lets one frame in every `threshold / step` through
///
/// Each frame adds `step` to a running count; once the count reaches
/// `threshold` the frame dispatches and `threshold` is subtracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    step: u32,
    threshold: u32,
    count: u32,
}

impl Throttle {
    pub fn new(step: u32, threshold: u32) -> Result<Self> {
        Self::validate(step, threshold)?;
        Ok(Self {
            step,
            threshold,
            count: 0,
        })
    }

    fn validate(step: u32, threshold: u32) -> Result<()> {
        if step == 0 || threshold == 0 || step > threshold {
            return Err(GestureError::InvalidThrottle { step, threshold });
        }
        Ok(())
    }

    /// Replace step and threshold and reset the running count.
    ///
    /// Leaves the throttle untouched on error.
    pub fn set(&mut self, step: u32, threshold: u32) -> Result<()> {
        Self::validate(step, threshold)?;
        self.step = step;
        self.threshold = threshold;
        self.count = 0;
        Ok(())
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Advance by one frame and report whether it should dispatch.
    ///
    /// A final frame always dispatches.
    pub fn advance(&mut self, is_final: bool) -> bool {
        if is_final {
            self.count = 0;
            return true;
        }
        // count + step >= threshold, without overflowing
        let headroom = self.threshold - self.step;
        if self.count >= headroom {
            self.count -= headroom;
            true
        } else {
            self.count += self.step;
            false
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            step: 1,
            threshold: 2,
            count: 0,
        }
    }
}
