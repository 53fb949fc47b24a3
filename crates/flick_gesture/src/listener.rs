//! Gesture listener registry
//!
//! Listeners are registered with capability flags and removed by the
//! [`ListenerId`] token handed out at registration. Dispatch runs in
//! registration order.

use slotmap::{new_key_type, SlotMap};
use tracing::warn;

use crate::contact::{ContactId, ContactRecord};

new_key_type! {
    /// Handle to a registered gesture listener
    pub struct ListenerId;
}

/// Callback invoked with each dispatched contact
///
/// An `Err` is logged and counted; it never stops dispatch to the remaining
/// listeners or contacts.
pub type GestureListener = Box<dyn FnMut(&ContactRecord) -> anyhow::Result<()>>;

/// A registered observer
pub struct ListenerEntry {
    callback: GestureListener,
    /// Receives real touch contacts
    pub wants_touch: bool,
    /// Receives the synthetic mouse contact
    pub wants_mouse: bool,
}

impl ListenerEntry {
    /// Whether this entry should see contacts with the given id
    pub fn matches(&self, id: ContactId) -> bool {
        if id.is_mouse() {
            self.wants_mouse
        } else {
            self.wants_touch
        }
    }
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("wants_touch", &self.wants_touch)
            .field("wants_mouse", &self.wants_mouse)
            .finish_non_exhaustive()
    }
}

/// Outcome of notifying listeners about one contact
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Notified {
    pub invoked: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: SlotMap<ListenerId, ListenerEntry>,
    order: Vec<ListenerId>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, callback: F, wants_touch: bool, wants_mouse: bool) -> ListenerId
    where
        F: FnMut(&ContactRecord) -> anyhow::Result<()> + 'static,
    {
        let id = self.entries.insert(ListenerEntry {
            callback: Box::new(callback),
            wants_touch,
            wants_mouse,
        });
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        if self.entries.remove(id).is_none() {
            return false;
        }
        self.order.retain(|entry| *entry != id);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether any remaining listener wants mouse contacts
    pub fn any_wants_mouse(&self) -> bool {
        self.entries.values().any(|entry| entry.wants_mouse)
    }

    /// Whether any remaining listener wants touch contacts
    pub fn any_wants_touch(&self) -> bool {
        self.entries.values().any(|entry| entry.wants_touch)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Invoke every matching listener with `record`
    pub fn notify(&mut self, record: &ContactRecord) -> Notified {
        let mut notified = Notified::default();
        for id in &self.order {
            let Some(entry) = self.entries.get_mut(*id) else {
                continue;
            };
            if !entry.matches(record.id) {
                continue;
            }
            notified.invoked += 1;
            if let Err(err) = (entry.callback)(record) {
                notified.failed += 1;
                warn!(contact = ?record.id, "gesture listener failed: {err:#}");
            }
        }
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_core::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(id: ContactId) -> ContactRecord {
        ContactRecord {
            id,
            is_down: true,
            position: Vec2::ZERO,
            initial_position: Vec2::ZERO,
            delta: Vec2::ZERO,
            velocity: Vec2::ZERO,
            force: 1.0,
            last_update_time: 0.0,
            updated: true,
        }
    }

    fn recorder(
        log: &Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
    ) -> impl FnMut(&ContactRecord) -> anyhow::Result<()> {
        let log = Rc::clone(log);
        move |_| {
            log.borrow_mut().push(name);
            Ok(())
        }
    }

    #[test]
    fn test_capability_matching() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.add(recorder(&log, "mouse"), false, true);
        registry.add(recorder(&log, "touch"), true, false);

        registry.notify(&record(ContactId::Touch(3)));
        assert_eq!(*log.borrow(), vec!["touch"]);

        log.borrow_mut().clear();
        registry.notify(&record(ContactId::Mouse));
        assert_eq!(*log.borrow(), vec!["mouse"]);
    }

    #[test]
    fn test_dispatch_in_registration_order_after_removal() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        let a = registry.add(recorder(&log, "a"), true, true);
        registry.add(recorder(&log, "b"), true, true);
        registry.remove(a);
        registry.add(recorder(&log, "c"), true, true);

        registry.notify(&record(ContactId::Mouse));
        assert_eq!(*log.borrow(), vec!["b", "c"]);
    }

    #[test]
    fn test_remove_is_by_token() {
        let mut registry = ListenerRegistry::new();
        let a = registry.add(|_| Ok(()), true, false);
        let b = registry.add(|_| Ok(()), true, false);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(registry.contains(b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failure_does_not_stop_other_listeners() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.add(|_| anyhow::bail!("boom"), true, true);
        registry.add(recorder(&log, "after"), true, true);

        let notified = registry.notify(&record(ContactId::Touch(1)));
        assert_eq!(notified, Notified { invoked: 2, failed: 1 });
        assert_eq!(*log.borrow(), vec!["after"]);
    }

    #[test]
    fn test_capability_queries() {
        let mut registry = ListenerRegistry::new();
        assert!(!registry.any_wants_mouse());
        let id = registry.add(|_| Ok(()), false, true);
        assert!(registry.any_wants_mouse());
        assert!(!registry.any_wants_touch());
        registry.remove(id);
        assert!(!registry.any_wants_mouse());
    }
}
