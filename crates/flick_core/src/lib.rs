//! Flick Core
//!
//! Foundational primitives shared by the gesture and animation crates:
//!
//! - **Vectors**: [`Vec2`], an immutable-style 2D value for positions, deltas
//!   and velocities
//! - **Frame loops**: [`FrameLoop`], an explicit arm/disarm/cancel tick source
//!   that replaces recursive "request next frame" scheduling
//!
//! # Example
//!
//! ```rust
//! use flick_core::{FrameLoop, Vec2};
//!
//! let delta = Vec2::new(10.0, 0.0) - Vec2::ZERO;
//! assert_eq!(delta.distance(), 10.0);
//!
//! let mut frames = FrameLoop::new("demo");
//! frames.arm();
//! assert!(frames.begin_frame().is_some());
//! ```

pub mod frame;
pub mod vector;

pub use frame::{FrameLoop, FrameTick};
pub use vector::Vec2;
