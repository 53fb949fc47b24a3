//! Recorded input traces
//!
//! A trace is a JSON list of steps: raw input events, each tagged with the
//! surface it was observed on, and runs of display frames.
//!
//! ```json
//! {
//!   "steps": [
//!     {"step": "input", "event": {"mouse": {"event": "pressed", "x": 0, "y": 0, "buttons": "PRIMARY", "timestamp": 0}}},
//!     {"step": "frames", "count": 2},
//!     {"step": "input", "element": 3, "event": {"touch": {"event": "started", "touches": [{"id": 1, "x": 4, "y": 4}], "timestamp": 40}}}
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use flick_platform::{ElementId, InputEvent, InputTarget};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::TraceError;
use crate::session::GestureSession;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Trace {
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    /// A raw event. Without `element` it was observed on the root surface.
    Input {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<u64>,
        event: InputEvent,
    },
    /// Display refreshes
    Frames {
        #[serde(default = "default_frame_count")]
        count: u32,
    },
}

fn default_frame_count() -> u32 {
    1
}

/// Counts from one [`Trace::replay`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub ignored: usize,
    pub frames: usize,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let content = fs::read_to_string(path).map_err(|source| TraceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Feed every step to `session` in order
    pub fn replay(&self, session: &mut GestureSession) -> flick_animation::Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        for step in &self.steps {
            match step {
                TraceStep::Input { element, event } => {
                    let origin = InputTarget::from_element(element.map(ElementId));
                    if session.handle_event(origin, event) {
                        summary.events += 1;
                    } else {
                        summary.ignored += 1;
                    }
                }
                TraceStep::Frames { count } => {
                    for _ in 0..*count {
                        let frame = session.frame()?;
                        trace!(?frame, "replayed frame");
                        summary.frames += 1;
                    }
                }
            }
        }
        Ok(summary)
    }
}
