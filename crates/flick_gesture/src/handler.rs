//! Gesture input multiplexer
//!
//! Bridges raw mouse and touch events to per-contact gesture listeners.
//!
//! # Architecture
//!
//! ```text
//! Platform Input (mouse pressed, touch moved)
//!     ↓
//! GestureInputHandler::handle_event (only if a listener is attached)
//!     ↓
//! ContactTracker (begin / update per contact)
//!     ↓
//! GestureInputHandler::on_frame (throttled, once per vsync)
//!     ↓
//! Gesture listeners (ContactRecord with updated = true)
//! ```
//!
//! Each input kind has a *drag-start* listener on the current target
//! (`mousedown` / `touchstart`) while the kind is enabled, and *dragging*
//! listeners on the root surface (`mousemove` + `mouseup`, `touchmove` +
//! `touchend` + `touchcancel`) while a contact of that kind is pressed.
//!
//! # Example
//!
//! ```rust
//! use flick_gesture::GestureInputHandler;
//! use flick_platform::{InputTarget, MouseButtons, MouseEvent};
//!
//! let mut handler = GestureInputHandler::new(InputTarget::Root);
//! let _id = handler.add_listener(
//!     |contact| {
//!         println!("{:?} at {}", contact.id, contact.position);
//!         Ok(())
//!     },
//!     true,
//!     true,
//! );
//!
//! handler.handle_event(
//!     InputTarget::Root,
//!     &MouseEvent::Pressed { x: 0.0, y: 0.0, buttons: MouseButtons::PRIMARY, timestamp: 0.0 }.into(),
//! );
//!
//! // once per display refresh
//! if handler.frame_pending() {
//!     handler.on_frame();
//! }
//! ```

use flick_core::{FrameLoop, Vec2};
use flick_platform::{
    EventChannel, InputEvent, InputTarget, MouseEvent, SurfaceBindings, TouchEvent, TouchPoint,
};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::contact::{
    ContactId, ContactRecord, ContactSample, ContactTracker, VelocityMode, MOUSE_FORCE,
};
use crate::error::Result;
use crate::listener::{ListenerId, ListenerRegistry};
use crate::throttle::Throttle;

/// Input source kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Mouse,
    Touch,
}

impl InputKind {
    /// Listener that detects the start of a contact
    pub fn drag_start_channel(&self) -> EventChannel {
        match self {
            InputKind::Mouse => EventChannel::MouseDown,
            InputKind::Touch => EventChannel::TouchStart,
        }
    }

    /// Listeners attached to the root surface while a contact is pressed
    pub fn dragging_channels(&self) -> &'static [EventChannel] {
        match self {
            InputKind::Mouse => &[EventChannel::MouseMove, EventChannel::MouseUp],
            InputKind::Touch => &[
                EventChannel::TouchMove,
                EventChannel::TouchEnd,
                EventChannel::TouchCancel,
            ],
        }
    }
}

/// Hook state for one input kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSourceState {
    /// At least one contact of this kind is down; dragging listeners attached
    pub is_drag_active: bool,
    /// The drag-start listener is attached to the target
    pub is_input_hooked: bool,
}

/// What one call to [`GestureInputHandler::on_frame`] did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame counter of the handler's loop
    pub frame: u64,
    /// Whether the throttle let this frame dispatch
    pub dispatched: bool,
    /// Contacts whose update was delivered (or dropped while disabled)
    pub contacts: usize,
    /// Listener invocations
    pub notified: usize,
    /// Listener invocations that returned an error
    pub failures: usize,
    /// Released contacts removed after dispatch
    pub removed: usize,
}

/// Unifies mouse and touch input into a throttled stream of contact updates
pub struct GestureInputHandler {
    target: InputTarget,
    mouse: InputSourceState,
    touch: InputSourceState,
    use_mouse: bool,
    use_touch: bool,
    is_enabled: bool,
    throttle: Throttle,
    frames: FrameLoop,
    contacts: ContactTracker,
    listeners: ListenerRegistry,
    bindings: SurfaceBindings,
}

impl Default for GestureInputHandler {
    fn default() -> Self {
        Self::new(InputTarget::Root)
    }
}

impl GestureInputHandler {
    /// Create a handler bound to `target`.
    ///
    /// Nothing is hooked until a listener (or [`set_use_mouse`] /
    /// [`set_use_touch`]) enables an input kind. Pass [`InputTarget::Root`]
    /// to listen on the whole page.
    ///
    /// [`set_use_mouse`]: GestureInputHandler::set_use_mouse
    /// [`set_use_touch`]: GestureInputHandler::set_use_touch
    pub fn new(target: InputTarget) -> Self {
        Self {
            target,
            mouse: InputSourceState::default(),
            touch: InputSourceState::default(),
            use_mouse: false,
            use_touch: false,
            is_enabled: true,
            throttle: Throttle::default(),
            frames: FrameLoop::new("gesture"),
            contacts: ContactTracker::new(),
            listeners: ListenerRegistry::new(),
            bindings: SurfaceBindings::new(),
        }
    }

    // =========================================================================
    // Target
    // =========================================================================

    pub fn target(&self) -> InputTarget {
        self.target
    }

    /// Rebind the drag-start listeners to a new surface.
    ///
    /// Unhooks both kinds from the old target, cancels the frame loop, then
    /// re-hooks each kind that is enabled. [`InputTarget::None`] detaches.
    pub fn set_target(&mut self, target: InputTarget) {
        if self.target == target {
            return;
        }
        debug!(old = ?self.target, new = ?target, "gesture target changed");
        self.set_drag_start_hooked(InputKind::Mouse, false);
        self.set_drag_start_hooked(InputKind::Touch, false);
        self.frames.cancel();
        self.target = target;
        if !self.target.is_none() {
            self.set_drag_start_hooked(InputKind::Mouse, self.use_mouse);
            self.set_drag_start_hooked(InputKind::Touch, self.use_touch);
        }
    }

    // =========================================================================
    // Enablement
    // =========================================================================

    pub fn use_mouse(&self) -> bool {
        self.use_mouse
    }

    /// Enable or disable mouse events as a gesture source
    pub fn set_use_mouse(&mut self, value: bool) {
        if self.use_mouse != value {
            self.use_mouse = value;
            self.set_drag_start_hooked(InputKind::Mouse, value);
        }
    }

    pub fn use_touch(&self) -> bool {
        self.use_touch
    }

    /// Enable or disable touch events as a gesture source
    pub fn set_use_touch(&mut self, value: bool) {
        if self.use_touch != value {
            self.use_touch = value;
            self.set_drag_start_hooked(InputKind::Touch, value);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// When false, frames still clear and remove contacts but no listener is
    /// invoked. Throttle counting is unaffected.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = enabled;
    }

    /// Set how contact velocity is derived
    pub fn set_velocity_mode(&mut self, mode: VelocityMode) {
        self.contacts.set_velocity_mode(mode);
    }

    // =========================================================================
    // Throttle
    // =========================================================================

    /// Dispatch on one frame in every `threshold / step`.
    ///
    /// Both must be positive and `step <= threshold`; on error the current
    /// throttle is left as it was. Resets the running count.
    pub fn set_throttle(&mut self, step: u32, threshold: u32) -> Result<()> {
        self.throttle.set(step, threshold)
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener. Enables the input kinds it asks for.
    pub fn add_listener<F>(&mut self, listener: F, wants_touch: bool, wants_mouse: bool) -> ListenerId
    where
        F: FnMut(&ContactRecord) -> anyhow::Result<()> + 'static,
    {
        let id = self.listeners.add(listener, wants_touch, wants_mouse);
        if wants_touch {
            self.set_use_touch(true);
        }
        if wants_mouse {
            self.set_use_mouse(true);
        }
        id
    }

    /// Remove a listener by its registration token.
    ///
    /// Input kinds no remaining listener asks for are disabled. Returns
    /// whether the listener was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        if !self.listeners.any_wants_mouse() {
            self.set_use_mouse(false);
        }
        if !self.listeners.any_wants_touch() {
            self.set_use_touch(false);
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Detach from the target and drop every listener
    pub fn dispose(&mut self) {
        self.set_target(InputTarget::None);
        self.listeners.clear();
    }

    // =========================================================================
    // State queries
    // =========================================================================

    pub fn input_state(&self, kind: InputKind) -> InputSourceState {
        match kind {
            InputKind::Mouse => self.mouse,
            InputKind::Touch => self.touch,
        }
    }

    /// Whether a listener for `channel` is attached on `surface`
    pub fn is_listening(&self, surface: InputTarget, channel: EventChannel) -> bool {
        self.bindings.is_attached(surface, channel)
    }

    pub fn bindings(&self) -> &SurfaceBindings {
        &self.bindings
    }

    pub fn contacts(&self) -> &ContactTracker {
        &self.contacts
    }

    /// Whether the host should call [`on_frame`](Self::on_frame) on the next
    /// display refresh
    pub fn frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    // =========================================================================
    // Hook state
    // =========================================================================

    fn state_mut(&mut self, kind: InputKind) -> &mut InputSourceState {
        match kind {
            InputKind::Mouse => &mut self.mouse,
            InputKind::Touch => &mut self.touch,
        }
    }

    fn set_drag_start_hooked(&mut self, kind: InputKind, hooked: bool) {
        let target = self.target;
        let state = self.state_mut(kind);
        if state.is_input_hooked != hooked {
            state.is_input_hooked = hooked;
            self.bindings.set(target, kind.drag_start_channel(), hooked);
            debug!(?kind, hooked, "drag start hook changed");
        }

        if !hooked {
            self.set_dragging_active(kind, false);
        }

        if !self.mouse.is_input_hooked && !self.touch.is_input_hooked && !self.contacts.is_empty() {
            debug!(contacts = self.contacts.len(), "input unhooked, clearing contacts");
            self.contacts.clear();
        }
    }

    fn set_dragging_active(&mut self, kind: InputKind, active: bool) {
        let state = self.state_mut(kind);
        if state.is_drag_active != active {
            state.is_drag_active = active;
            for channel in kind.dragging_channels() {
                self.bindings.set(InputTarget::Root, *channel, active);
            }
            debug!(?kind, active, "dragging state changed");
        }

        if self.mouse.is_drag_active || self.touch.is_drag_active {
            self.frames.arm();
        } else {
            // let an outstanding frame deliver the final samples
            self.frames.disarm();
        }
    }

    // =========================================================================
    // Event normalization
    // =========================================================================

    /// Feed a raw event observed on `origin`.
    ///
    /// The event is processed only if a listener for its channel is attached
    /// on a surface that `origin` reaches. Returns whether it was processed.
    pub fn handle_event(&mut self, origin: InputTarget, event: &InputEvent) -> bool {
        if !self.bindings.receives(origin, event.channel()) {
            trace!(?origin, channel = event.channel().as_str(), "event ignored");
            return false;
        }
        match event {
            InputEvent::Mouse(mouse) => self.on_mouse(mouse),
            InputEvent::Touch(touch) => self.on_touch(touch),
        }
        true
    }

    fn on_mouse(&mut self, event: &MouseEvent) {
        let (x, y) = event.position();
        let sample = ContactSample {
            id: ContactId::Mouse,
            position: Vec2::new(x, y),
            is_down: event.buttons().primary(),
            force: MOUSE_FORCE,
            timestamp: event.timestamp(),
        };

        match event {
            MouseEvent::Pressed { .. } => {
                self.contacts.begin(&sample);
                self.set_dragging_active(InputKind::Mouse, true);
            }
            MouseEvent::Moved { .. } => {
                if !self.contacts.update(&sample) {
                    self.contacts.begin(&sample);
                }
                if !sample.is_down {
                    self.set_dragging_active(InputKind::Mouse, false);
                }
            }
            MouseEvent::Released { .. } => {
                self.contacts.update(&sample);
                self.set_dragging_active(InputKind::Mouse, false);
            }
        }
    }

    fn on_touch(&mut self, event: &TouchEvent) {
        let timestamp = event.timestamp();
        let sample = |touch: &TouchPoint, is_down: bool| ContactSample {
            id: ContactId::Touch(touch.id),
            position: Vec2::new(touch.x, touch.y),
            is_down,
            force: touch.force,
            timestamp,
        };

        match event {
            TouchEvent::Started { touches, .. } => {
                for touch in touches {
                    self.contacts.begin(&sample(touch, true));
                }
                self.set_dragging_active(InputKind::Touch, true);
            }
            TouchEvent::Moved { touches, .. } => {
                for touch in touches {
                    let sample = sample(touch, true);
                    // late touches are only adopted when listening on the
                    // whole page, never when scoped to an element
                    if !self.contacts.update(&sample) && self.target.is_root() {
                        self.contacts.begin(&sample);
                    }
                }
            }
            TouchEvent::Ended { touches, .. } | TouchEvent::Cancelled { touches, .. } => {
                for touch in touches {
                    self.contacts.update(&sample(touch, false));
                }
                if !self.contacts.has_touch_down() {
                    self.set_dragging_active(InputKind::Touch, false);
                }
            }
        }
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Run one frame: dispatch pending contact updates through the throttle.
    ///
    /// Returns `None` if no frame was requested.
    pub fn on_frame(&mut self) -> Option<FrameReport> {
        let tick = self.frames.begin_frame()?;
        let mut report = FrameReport {
            frame: tick.index,
            dispatched: self.throttle.advance(tick.is_final),
            ..FrameReport::default()
        };

        if report.dispatched && !self.contacts.is_empty() {
            let mut released: SmallVec<[ContactId; 4]> = SmallVec::new();
            for record in self.contacts.iter_mut() {
                if !record.updated {
                    continue;
                }
                if !record.is_down {
                    released.push(record.id);
                }
                if self.is_enabled {
                    let notified = self.listeners.notify(record);
                    report.notified += notified.invoked;
                    report.failures += notified.failed;
                }
                record.updated = false;
                report.contacts += 1;
            }

            for id in released {
                self.contacts.remove(id);
                report.removed += 1;
            }
        }

        trace!(
            frame = report.frame,
            dispatched = report.dispatched,
            contacts = report.contacts,
            removed = report.removed,
            "gesture frame"
        );
        self.frames.finish_frame();
        Some(report)
    }
}

impl std::fmt::Debug for GestureInputHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureInputHandler")
            .field("target", &self.target)
            .field("mouse", &self.mouse)
            .field("touch", &self.touch)
            .field("use_mouse", &self.use_mouse)
            .field("use_touch", &self.use_touch)
            .field("is_enabled", &self.is_enabled)
            .field("throttle", &self.throttle)
            .field("contacts", &self.contacts.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
