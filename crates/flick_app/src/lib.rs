//! Flick application shell
//!
//! Thin composition layer over the library crates:
//!
//! - [`config`] - `flick.toml` loading and validation
//! - [`session`] - [`GestureSession`], a gesture handler feeding a spring
//! - [`trace`] - recorded input traces and their replay
//!
//! The `flick` binary replays a trace through a session and logs what the
//! spring does.

pub mod config;
pub mod error;
pub mod session;
pub mod trace;

pub use config::FlickConfig;
pub use error::{ConfigError, TraceError};
pub use session::{FrameSummary, GestureSession};
pub use trace::{ReplaySummary, Trace, TraceStep};
