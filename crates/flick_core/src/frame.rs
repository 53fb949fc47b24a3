//! Restartable frame loop
//!
//! A [`FrameLoop`] stands in for "request the next display refresh". The host
//! drives it: once per vsync it calls [`FrameLoop::begin_frame`] on every loop
//! that [`is_pending`](FrameLoop::is_pending) and runs the owner's frame work.
//!
//! Three ways to stop:
//!
//! - [`FrameLoop::disarm`] is a soft stop. A frame that is already requested
//!   still runs once, flagged as final, so the last batch of work is delivered.
//! - [`FrameLoop::cancel`] is a hard stop. Any outstanding request is dropped.
//! - Not re-arming from inside the frame lets the loop lapse on its own.

use tracing::trace;

/// One frame handed out by [`FrameLoop::begin_frame`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// Monotonic frame counter for this loop
    pub index: u64,
    /// True when the loop was disarmed before this frame ran
    pub is_final: bool,
}

/// Arm/disarm/cancel state for a self-rescheduling frame callback
#[derive(Clone, Debug)]
pub struct FrameLoop {
    name: &'static str,
    keep_armed: bool,
    pending: bool,
    frames: u64,
}

impl FrameLoop {
    /// Create an idle loop. `name` only shows up in trace output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            keep_armed: false,
            pending: false,
            frames: 0,
        }
    }

    /// Keep requesting frames until disarmed or cancelled
    pub fn arm(&mut self) {
        self.keep_armed = true;
        if !self.pending {
            self.pending = true;
            trace!(loop_name = self.name, "frame requested");
        }
    }

    /// Stop re-requesting, but let an outstanding frame run one last time
    pub fn disarm(&mut self) {
        self.keep_armed = false;
    }

    /// Stop re-requesting and drop any outstanding frame
    pub fn cancel(&mut self) {
        self.keep_armed = false;
        if self.pending {
            self.pending = false;
            trace!(loop_name = self.name, "frame cancelled");
        }
    }

    /// Whether the owner wants frames after the current one
    pub fn is_armed(&self) -> bool {
        self.keep_armed
    }

    /// Whether a frame has been requested and not yet run
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of frames that have run so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Consume the outstanding request, if any
    pub fn begin_frame(&mut self) -> Option<FrameTick> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        let tick = FrameTick {
            index: self.frames,
            is_final: !self.keep_armed,
        };
        self.frames += 1;
        Some(tick)
    }

    /// Re-request the next frame if the loop is still armed
    pub fn finish_frame(&mut self) {
        if self.keep_armed {
            self.pending = true;
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new("frame")
    }
}
