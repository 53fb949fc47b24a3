//! Flick Platform Input Model
//!
//! This crate provides the platform-facing side of gesture input: the raw
//! event shapes a windowing backend reports and the surfaces those events are
//! observed on.
//!
//! # Architecture
//!
//! - [`InputEvent`] - Tagged union of [`MouseEvent`] and [`TouchEvent`]
//! - [`EventChannel`] - The raw listener an event is delivered on
//! - [`InputTarget`] - Root surface, a bounded element, or detached
//! - [`SurfaceBindings`] - Which channels are attached to which surface
//!
//! Backends translate their native events into [`InputEvent`] and hand them,
//! along with the surface they were observed on, to the gesture layer.

mod input;
mod surface;

// Re-export all public types
pub use input::{
    ChangedTouches, EventChannel, InputEvent, Millis, MouseButtons, MouseEvent, TouchEvent,
    TouchPoint,
};
pub use surface::{ElementId, InputTarget, SurfaceBindings};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::input::{
        EventChannel, InputEvent, MouseButtons, MouseEvent, TouchEvent, TouchPoint,
    };
    pub use crate::surface::{ElementId, InputTarget, SurfaceBindings};
}
