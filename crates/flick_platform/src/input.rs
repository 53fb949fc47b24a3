//! Raw input event types for mouse and touch
//!
//! These mirror what a windowing backend reports before any gesture
//! processing. Coordinates are page-space, timestamps are milliseconds on a
//! monotonic clock shared by every event of one session.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Timestamp in milliseconds
pub type Millis = f64;

/// Input events
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse event
    Mouse(MouseEvent),
    /// Touch event (touchscreen)
    Touch(TouchEvent),
}

impl InputEvent {
    /// The listener channel this event is delivered on
    pub fn channel(&self) -> EventChannel {
        match self {
            InputEvent::Mouse(mouse) => mouse.channel(),
            InputEvent::Touch(touch) => touch.channel(),
        }
    }

    /// Event timestamp in milliseconds
    pub fn timestamp(&self) -> Millis {
        match self {
            InputEvent::Mouse(mouse) => mouse.timestamp(),
            InputEvent::Touch(touch) => touch.timestamp(),
        }
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(event: MouseEvent) -> Self {
        InputEvent::Mouse(event)
    }
}

impl From<TouchEvent> for InputEvent {
    fn from(event: TouchEvent) -> Self {
        InputEvent::Touch(event)
    }
}

/// Listener channels, one per raw event name a surface can dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventChannel {
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
}

impl EventChannel {
    /// Name of the event as a web-style surface would spell it
    pub fn as_str(&self) -> &'static str {
        match self {
            EventChannel::MouseDown => "mousedown",
            EventChannel::MouseMove => "mousemove",
            EventChannel::MouseUp => "mouseup",
            EventChannel::TouchStart => "touchstart",
            EventChannel::TouchMove => "touchmove",
            EventChannel::TouchEnd => "touchend",
            EventChannel::TouchCancel => "touchcancel",
        }
    }
}

// ============================================================================
// Mouse Events
// ============================================================================

bitflags! {
    /// Mouse buttons held down at the time of an event
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MouseButtons: u16 {
        /// Usually the left button
        const PRIMARY = 1;
        /// Usually the right button
        const SECONDARY = 1 << 1;
        /// Usually the wheel button
        const AUXILIARY = 1 << 2;
        /// Back side button
        const BACK = 1 << 3;
        /// Forward side button
        const FORWARD = 1 << 4;
    }
}

impl MouseButtons {
    /// Check if the primary button is held
    pub fn primary(&self) -> bool {
        self.contains(MouseButtons::PRIMARY)
    }
}

/// Mouse events
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MouseEvent {
    /// Mouse button pressed
    Pressed {
        /// X position in page coordinates
        x: f32,
        /// Y position in page coordinates
        y: f32,
        /// Buttons held after the press
        #[serde(default)]
        buttons: MouseButtons,
        /// Event time in milliseconds
        timestamp: Millis,
    },
    /// Mouse moved to position
    Moved {
        x: f32,
        y: f32,
        #[serde(default)]
        buttons: MouseButtons,
        timestamp: Millis,
    },
    /// Mouse button released
    Released {
        x: f32,
        y: f32,
        /// Buttons still held after the release
        #[serde(default)]
        buttons: MouseButtons,
        timestamp: Millis,
    },
}

impl MouseEvent {
    /// Position in page coordinates
    pub fn position(&self) -> (f32, f32) {
        match self {
            MouseEvent::Pressed { x, y, .. }
            | MouseEvent::Moved { x, y, .. }
            | MouseEvent::Released { x, y, .. } => (*x, *y),
        }
    }

    /// Buttons held at the time of the event
    pub fn buttons(&self) -> MouseButtons {
        match self {
            MouseEvent::Pressed { buttons, .. }
            | MouseEvent::Moved { buttons, .. }
            | MouseEvent::Released { buttons, .. } => *buttons,
        }
    }

    /// Event time in milliseconds
    pub fn timestamp(&self) -> Millis {
        match self {
            MouseEvent::Pressed { timestamp, .. }
            | MouseEvent::Moved { timestamp, .. }
            | MouseEvent::Released { timestamp, .. } => *timestamp,
        }
    }

    pub fn channel(&self) -> EventChannel {
        match self {
            MouseEvent::Pressed { .. } => EventChannel::MouseDown,
            MouseEvent::Moved { .. } => EventChannel::MouseMove,
            MouseEvent::Released { .. } => EventChannel::MouseUp,
        }
    }
}

// ============================================================================
// Touch Events
// ============================================================================

/// One touch point that changed in a touch event
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Identifier, stable for the lifetime of one touch
    pub id: u64,
    /// X position in page coordinates
    pub x: f32,
    /// Y position in page coordinates
    pub y: f32,
    /// Touch pressure (0.0 - 1.0)
    #[serde(default)]
    pub force: f32,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32, force: f32) -> Self {
        Self { id, x, y, force }
    }
}

/// Touches that changed in one event; most events carry one or two
pub type ChangedTouches = SmallVec<[TouchPoint; 4]>;

/// Touch events for touchscreens
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TouchEvent {
    /// One or more touches started
    Started {
        touches: ChangedTouches,
        timestamp: Millis,
    },
    /// One or more touches moved
    Moved {
        touches: ChangedTouches,
        timestamp: Millis,
    },
    /// One or more touches lifted
    Ended {
        touches: ChangedTouches,
        timestamp: Millis,
    },
    /// One or more touches were cancelled (e.g., by a system gesture)
    Cancelled {
        touches: ChangedTouches,
        timestamp: Millis,
    },
}

impl TouchEvent {
    /// The touches that changed in this event
    pub fn touches(&self) -> &[TouchPoint] {
        match self {
            TouchEvent::Started { touches, .. }
            | TouchEvent::Moved { touches, .. }
            | TouchEvent::Ended { touches, .. }
            | TouchEvent::Cancelled { touches, .. } => touches,
        }
    }

    /// Event time in milliseconds
    pub fn timestamp(&self) -> Millis {
        match self {
            TouchEvent::Started { timestamp, .. }
            | TouchEvent::Moved { timestamp, .. }
            | TouchEvent::Ended { timestamp, .. }
            | TouchEvent::Cancelled { timestamp, .. } => *timestamp,
        }
    }

    pub fn channel(&self) -> EventChannel {
        match self {
            TouchEvent::Started { .. } => EventChannel::TouchStart,
            TouchEvent::Moved { .. } => EventChannel::TouchMove,
            TouchEvent::Ended { .. } => EventChannel::TouchEnd,
            TouchEvent::Cancelled { .. } => EventChannel::TouchCancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_channels_match_event_kinds() {
        let down = MouseEvent::Pressed {
            x: 0.0,
            y: 0.0,
            buttons: MouseButtons::PRIMARY,
            timestamp: 0.0,
        };
        assert_eq!(InputEvent::from(down).channel(), EventChannel::MouseDown);

        let cancel = TouchEvent::Cancelled {
            touches: smallvec![TouchPoint::new(3, 1.0, 2.0, 0.5)],
            timestamp: 16.0,
        };
        assert_eq!(cancel.channel(), EventChannel::TouchCancel);
        assert_eq!(cancel.touches()[0].id, 3);
        assert_eq!(EventChannel::TouchCancel.as_str(), "touchcancel");
    }

    #[test]
    fn test_primary_button_bit() {
        assert!(MouseButtons::PRIMARY.primary());
        assert!((MouseButtons::PRIMARY | MouseButtons::SECONDARY).primary());
        assert!(!MouseButtons::SECONDARY.primary());
        assert!(!MouseButtons::empty().primary());
    }

    #[test]
    fn test_deserialize_recorded_events() {
        let json = r#"[
            {"mouse": {"event": "pressed", "x": 1.0, "y": 2.0, "buttons": "PRIMARY", "timestamp": 5.0}},
            {"touch": {"event": "moved", "touches": [{"id": 7, "x": 3.0, "y": 4.0}], "timestamp": 21.0}}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();

        assert_eq!(events[0].channel(), EventChannel::MouseDown);
        match &events[0] {
            InputEvent::Mouse(mouse) => {
                assert_eq!(mouse.position(), (1.0, 2.0));
                assert!(mouse.buttons().primary());
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(events[1].timestamp(), 21.0);
        match &events[1] {
            InputEvent::Touch(touch) => assert_eq!(touch.touches()[0].force, 0.0),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
