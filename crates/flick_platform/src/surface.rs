//! Input surfaces and listener bindings
//!
//! An [`InputTarget`] names where listeners are attached: the unscoped root
//! surface (the whole window), one bounded element, or nothing at all.
//! [`SurfaceBindings`] records which raw event channels are currently attached
//! to which surface, and answers whether an event observed at some origin
//! reaches an attached listener.

use smallvec::SmallVec;
use tracing::debug;

use crate::input::EventChannel;

/// Identifier of a bounded element on the page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// A surface listeners can be attached to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputTarget {
    /// Detached: attaching to it is a no-op
    None,
    /// The unscoped root surface; sees every event on the page
    #[default]
    Root,
    /// A single bounded element
    Element(ElementId),
}

impl InputTarget {
    /// The element if one is given, otherwise the root surface
    pub fn from_element(element: Option<ElementId>) -> Self {
        element.map_or(InputTarget::Root, InputTarget::Element)
    }

    /// Returns true for [`InputTarget::Root`]
    pub fn is_root(&self) -> bool {
        matches!(self, InputTarget::Root)
    }

    /// Returns true for [`InputTarget::None`]
    pub fn is_none(&self) -> bool {
        matches!(self, InputTarget::None)
    }

    /// Whether an event that originated at `origin` reaches listeners on this
    /// surface. Element events bubble up to the root.
    pub fn receives(&self, origin: InputTarget) -> bool {
        match (self, origin) {
            (InputTarget::None, _) | (_, InputTarget::None) => false,
            (InputTarget::Root, _) => true,
            (InputTarget::Element(own), InputTarget::Element(hit)) => *own == hit,
            (InputTarget::Element(_), InputTarget::Root) => false,
        }
    }
}

/// The set of (surface, channel) listeners currently attached
#[derive(Clone, Debug, Default)]
pub struct SurfaceBindings {
    attached: SmallVec<[(InputTarget, EventChannel); 8]>,
}

impl SurfaceBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener for `channel` on `target`.
    ///
    /// Returns false if nothing changed: the target is [`InputTarget::None`]
    /// or the listener is already attached.
    pub fn attach(&mut self, target: InputTarget, channel: EventChannel) -> bool {
        if target.is_none() || self.is_attached(target, channel) {
            return false;
        }
        debug!(?target, channel = channel.as_str(), "listener attached");
        self.attached.push((target, channel));
        true
    }

    /// Detach the listener for `channel` on `target`, if attached
    pub fn detach(&mut self, target: InputTarget, channel: EventChannel) -> bool {
        let before = self.attached.len();
        self.attached
            .retain(|(t, c)| !(*t == target && *c == channel));
        let removed = self.attached.len() != before;
        if removed {
            debug!(?target, channel = channel.as_str(), "listener detached");
        }
        removed
    }

    /// Attach or detach in one call
    pub fn set(&mut self, target: InputTarget, channel: EventChannel, attached: bool) -> bool {
        if attached {
            self.attach(target, channel)
        } else {
            self.detach(target, channel)
        }
    }

    pub fn is_attached(&self, target: InputTarget, channel: EventChannel) -> bool {
        self.attached
            .iter()
            .any(|(t, c)| *t == target && *c == channel)
    }

    /// Whether an event on `channel` that originated at `origin` reaches any
    /// attached listener
    pub fn receives(&self, origin: InputTarget, channel: EventChannel) -> bool {
        self.attached
            .iter()
            .any(|(t, c)| *c == channel && t.receives(origin))
    }

    /// Number of attached listeners
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: InputTarget = InputTarget::Element(ElementId(1));
    const OTHER: InputTarget = InputTarget::Element(ElementId(2));

    #[test]
    fn test_root_receives_bubbled_element_events() {
        assert!(InputTarget::Root.receives(PANEL));
        assert!(InputTarget::Root.receives(InputTarget::Root));
        assert!(PANEL.receives(PANEL));
        assert!(!PANEL.receives(OTHER));
        assert!(!PANEL.receives(InputTarget::Root));
        assert!(!InputTarget::None.receives(PANEL));
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut bindings = SurfaceBindings::new();
        assert!(bindings.attach(PANEL, EventChannel::MouseDown));
        assert!(!bindings.attach(PANEL, EventChannel::MouseDown));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_attach_to_none_is_noop() {
        let mut bindings = SurfaceBindings::new();
        assert!(!bindings.attach(InputTarget::None, EventChannel::TouchStart));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_detach_only_removes_matching_listener() {
        let mut bindings = SurfaceBindings::new();
        bindings.attach(PANEL, EventChannel::MouseDown);
        bindings.attach(InputTarget::Root, EventChannel::MouseMove);

        assert!(bindings.detach(PANEL, EventChannel::MouseDown));
        assert!(!bindings.detach(PANEL, EventChannel::MouseDown));
        assert!(bindings.is_attached(InputTarget::Root, EventChannel::MouseMove));
    }

    #[test]
    fn test_receives_respects_scope() {
        let mut bindings = SurfaceBindings::new();
        bindings.attach(PANEL, EventChannel::TouchStart);

        assert!(bindings.receives(PANEL, EventChannel::TouchStart));
        assert!(!bindings.receives(OTHER, EventChannel::TouchStart));
        assert!(!bindings.receives(PANEL, EventChannel::TouchMove));
    }

    #[test]
    fn test_from_element() {
        assert_eq!(InputTarget::from_element(None), InputTarget::Root);
        assert_eq!(
            InputTarget::from_element(Some(ElementId(4))),
            InputTarget::Element(ElementId(4))
        );
    }
}
