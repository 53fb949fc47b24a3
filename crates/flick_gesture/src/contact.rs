//! Contact tracking
//!
//! Every active input point is one [`ContactRecord`]. The mouse is folded in
//! as a single synthetic contact ([`ContactId::Mouse`]); each touch is its own
//! contact keyed by the platform touch identifier.
//!
//! The tracker never decides whether an unknown contact should be adopted.
//! [`ContactTracker::update`] reports a miss with `false` and the caller picks
//! the policy for its input kind.

use flick_core::Vec2;
use flick_platform::Millis;
use indexmap::IndexMap;

/// Force reported for the synthetic mouse contact
pub const MOUSE_FORCE: f32 = 1.0;

/// Identity of one contact
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactId {
    /// The synthetic contact standing in for the mouse
    Mouse,
    /// A real touch, by platform identifier
    Touch(u64),
}

impl ContactId {
    /// Returns true for the synthetic mouse contact
    pub fn is_mouse(&self) -> bool {
        matches!(self, ContactId::Mouse)
    }
}

/// How [`ContactTracker::update`] derives velocity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VelocityMode {
    /// Velocity is measured against the position that was just written, so it
    /// always comes out as zero. Consumers tuned against this keep the damped
    /// behaviour they were built on. A sample with no elapsed time also
    /// reports zero, where `0 / 0` would have produced NaN.
    #[default]
    Legacy,
    /// Displacement from the previously stored position over elapsed seconds.
    /// A sample with no elapsed time keeps the last velocity.
    Instantaneous,
}

/// One normalized input sample, mouse or touch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactSample {
    pub id: ContactId,
    pub position: Vec2,
    pub is_down: bool,
    pub force: f32,
    /// Milliseconds
    pub timestamp: Millis,
}

/// State of one active contact
#[derive(Clone, Debug, PartialEq)]
pub struct ContactRecord {
    pub id: ContactId,
    /// True while the finger or primary mouse button is pressed
    pub is_down: bool,
    pub position: Vec2,
    pub initial_position: Vec2,
    /// Always `position - initial_position`
    pub delta: Vec2,
    /// Units per second
    pub velocity: Vec2,
    pub force: f32,
    /// Milliseconds
    pub last_update_time: Millis,
    /// Set by every sample, cleared once listeners have seen it
    pub updated: bool,
}

impl ContactRecord {
    fn from_sample(sample: &ContactSample) -> Self {
        Self {
            id: sample.id,
            is_down: sample.is_down,
            position: sample.position,
            initial_position: sample.position,
            delta: Vec2::ZERO,
            velocity: Vec2::ZERO,
            force: sample.force,
            last_update_time: sample.timestamp,
            updated: true,
        }
    }
}

/// The set of active contacts, in first-seen order
#[derive(Clone, Debug, Default)]
pub struct ContactTracker {
    contacts: IndexMap<ContactId, ContactRecord>,
    velocity_mode: VelocityMode,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity_mode(velocity_mode: VelocityMode) -> Self {
        Self {
            contacts: IndexMap::new(),
            velocity_mode,
        }
    }

    pub fn velocity_mode(&self) -> VelocityMode {
        self.velocity_mode
    }

    pub fn set_velocity_mode(&mut self, velocity_mode: VelocityMode) {
        self.velocity_mode = velocity_mode;
    }

    /// Start a contact, replacing any record that already uses this id
    pub fn begin(&mut self, sample: &ContactSample) {
        self.contacts
            .insert(sample.id, ContactRecord::from_sample(sample));
    }

    /// Apply a sample to an existing contact.
    ///
    /// Returns false, touching nothing, if no record exists for the id.
    pub fn update(&mut self, sample: &ContactSample) -> bool {
        let velocity_mode = self.velocity_mode;
        let Some(record) = self.contacts.get_mut(&sample.id) else {
            return false;
        };

        let elapsed = ((sample.timestamp - record.last_update_time) / 1000.0) as f32;
        let previous = record.position;

        record.position = sample.position;
        record.delta = record.position - record.initial_position;
        record.velocity = match velocity_mode {
            // (sample.position - record.position) / elapsed, with position
            // already overwritten
            VelocityMode::Legacy => Vec2::ZERO,
            VelocityMode::Instantaneous if elapsed > 0.0 => (sample.position - previous) / elapsed,
            VelocityMode::Instantaneous => record.velocity,
        };
        record.last_update_time = sample.timestamp;
        record.updated = true;
        record.is_down = sample.is_down;
        record.force = sample.force;
        true
    }

    pub fn get(&self, id: ContactId) -> Option<&ContactRecord> {
        self.contacts.get(&id)
    }

    pub(crate) fn remove(&mut self, id: ContactId) -> Option<ContactRecord> {
        self.contacts.shift_remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactRecord> {
        self.contacts.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ContactRecord> {
        self.contacts.values_mut()
    }

    /// Whether any real touch (not the synthetic mouse) is still pressed
    pub fn has_touch_down(&self) -> bool {
        self.contacts
            .values()
            .any(|record| !record.id.is_mouse() && record.is_down)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}
