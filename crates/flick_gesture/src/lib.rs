//! Flick Gesture Input
//!
//! Unifies mouse and multi-touch input into one stream of per-contact motion
//! samples.
//!
//! # Features
//!
//! - **Unified contacts**: The mouse is a single synthetic contact, each touch
//!   is its own ([`ContactId`])
//! - **Lazy hooking**: Raw listeners are attached only while an input kind is
//!   enabled, and move/end listeners only while a contact is pressed
//! - **Frame-throttled dispatch**: Dirty contacts are delivered once per
//!   throttled frame; the last frame of a drag always dispatches
//! - **Token-based listeners**: Registration returns a [`ListenerId`] used for
//!   removal
//!
//! See [`GestureInputHandler`] for the full event flow.

pub mod contact;
pub mod error;
pub mod handler;
pub mod listener;
pub mod throttle;

pub use contact::{
    ContactId, ContactRecord, ContactSample, ContactTracker, VelocityMode, MOUSE_FORCE,
};
pub use error::{GestureError, Result};
pub use handler::{FrameReport, GestureInputHandler, InputKind, InputSourceState};
pub use listener::{GestureListener, ListenerEntry, ListenerId, ListenerRegistry, Notified};
pub use throttle::Throttle;
