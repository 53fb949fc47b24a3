//! Damped spring animator
//!
//! A [`SpringAnimator`] pulls a 2D offset back to its anchor with a
//! semi-implicit Euler step per frame:
//!
//! ```text
//! velocity = (target - current) * spring + velocity
//! velocity = velocity * friction
//! current  = current + velocity
//! ```
//!
//! While a contact is held the offset follows the drag exactly. On release the
//! target snaps back to the anchor and the spring takes over until the offset
//! is within `tolerance` of the anchor.

use flick_core::{FrameLoop, Vec2};
use flick_gesture::ContactRecord;
use tracing::{debug, trace};

use crate::error::{AnimationError, Result};
use crate::interpolate::{remap, round_hundredths};

/// Distance from the anchor below which a released spring is settled
pub const DEFAULT_TOLERANCE: f32 = 0.05;

/// Spring constants
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringAnimationConfig {
    /// Stiffness, fraction of the remaining distance added to velocity per frame
    pub spring: f32,
    /// Velocity multiplier per frame, in `(0, 1)`
    pub friction: f32,
}

impl SpringAnimationConfig {
    pub fn new(spring: f32, friction: f32) -> Self {
        Self { spring, friction }
    }

    /// Check the constants describe a spring that comes to rest
    pub fn validate(&self) -> Result<()> {
        if !(self.spring.is_finite() && self.spring > 0.0) {
            return Err(AnimationError::InvalidConfig(format!(
                "spring must be positive, got {}",
                self.spring
            )));
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(AnimationError::InvalidConfig(format!(
                "friction must be in (0, 1), got {}",
                self.friction
            )));
        }
        Ok(())
    }
}

impl Default for SpringAnimationConfig {
    fn default() -> Self {
        Self {
            spring: 0.1,
            friction: 0.95,
        }
    }
}

/// Receives the animated offset once per frame
pub trait Renderer {
    fn translate(&mut self, offset: Vec2);
}

impl<F: FnMut(Vec2)> Renderer for F {
    fn translate(&mut self, offset: Vec2) {
        self(offset)
    }
}

/// Lifecycle hooks
///
/// `on_start` fires when a drag is released away from the anchor,
/// `on_update` with each new motion value while springing back, and
/// `on_complete` once the spring settles.
#[derive(Default)]
pub struct SpringCallbacks {
    on_start: Option<Box<dyn FnMut()>>,
    on_update: Option<Box<dyn FnMut(f32)>>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl SpringCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn on_update<F: FnMut(f32) + 'static>(mut self, callback: F) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_complete<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    fn start(&mut self) {
        if let Some(callback) = self.on_start.as_mut() {
            callback();
        }
    }

    fn update(&mut self, motion_value: f32) {
        if let Some(callback) = self.on_update.as_mut() {
            callback(motion_value);
        }
    }

    fn complete(&mut self) {
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }
}

impl std::fmt::Debug for SpringCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpringCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Result of one integration step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringTick {
    /// Offset handed to the renderer
    pub position: Vec2,
    /// Motion value reported to `on_update` this step, if any
    pub motion_value: Option<f32>,
    /// True on the step that came to rest
    pub settled: bool,
}

/// Spring-back animation for a dragged offset
pub struct SpringAnimator {
    config: SpringAnimationConfig,
    tolerance: f32,
    current: Vec2,
    target: Vec2,
    velocity: Vec2,
    anchor: Vec2,
    /// Where the last fling was released from, zero when there is none
    initial: Vec2,
    motion_value: f32,
    is_dragging: bool,
    is_animating: bool,
    frames: FrameLoop,
    callbacks: SpringCallbacks,
    renderer: Box<dyn Renderer>,
}

impl SpringAnimator {
    /// Create an idle animator resting at the origin.
    ///
    /// `config` is taken as given; use [`SpringAnimator::set_config`] for a
    /// checked replacement.
    pub fn new<R: Renderer + 'static>(
        config: SpringAnimationConfig,
        callbacks: SpringCallbacks,
        renderer: R,
    ) -> Self {
        Self {
            config,
            tolerance: DEFAULT_TOLERANCE,
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            velocity: Vec2::ZERO,
            anchor: Vec2::ZERO,
            initial: Vec2::ZERO,
            motion_value: 0.0,
            is_dragging: false,
            is_animating: false,
            frames: FrameLoop::new("spring"),
            callbacks,
            renderer: Box::new(renderer),
        }
    }

    /// Begin animating and run the first step right away
    pub fn start(&mut self) -> Result<SpringTick> {
        debug!(current = %self.current, target = %self.target, "spring started");
        self.is_animating = true;
        self.animate()
    }

    /// Stop animating and drop any requested frame
    pub fn stop(&mut self) {
        if self.is_animating {
            debug!(current = %self.current, "spring stopped");
        }
        self.is_animating = false;
        self.frames.cancel();
    }

    /// Feed a contact from the gesture handler
    pub fn on_gesture(&mut self, contact: &ContactRecord) -> Result<()> {
        self.is_dragging = contact.is_down;

        if contact.is_down {
            self.target = self.anchor + contact.delta;
            if !self.is_animating {
                self.start()?;
            }
            return Ok(());
        }

        if contact.delta.is_nonzero() {
            self.initial = self.target;
            debug!(initial = %self.initial, "spring released");
            self.callbacks.start();
        }
        self.target = self.anchor;
        Ok(())
    }

    /// Run one frame if one is pending
    ///
    /// A degenerate motion value range surfaces as an error after the
    /// position has already been rendered.
    pub fn tick(&mut self) -> Result<Option<SpringTick>> {
        if self.frames.begin_frame().is_none() {
            return Ok(None);
        }
        let result = self.animate();
        self.frames.finish_frame();
        result.map(Some)
    }

    fn animate(&mut self) -> Result<SpringTick> {
        self.frames.arm();

        if self.is_dragging {
            self.current = self.target;
        } else {
            self.velocity = (self.target - self.current) * self.config.spring + self.velocity;
            self.velocity = self.velocity * self.config.friction;
            self.current = self.current + self.velocity;
        }

        let mut tick = SpringTick {
            position: self.current,
            motion_value: None,
            settled: false,
        };
        let mut outcome = Ok(());

        if !self.is_dragging && self.current.distance_to(self.anchor) < self.tolerance {
            self.is_animating = false;
            self.initial = Vec2::ZERO;
            self.frames.cancel();
            tick.settled = true;
            debug!(current = %self.current, "spring settled");
            self.callbacks.complete();
        } else if self.initial.is_nonzero() {
            match remap(
                self.current.distance(),
                self.initial.distance(),
                self.anchor.distance(),
                0.0,
                1.0,
            ) {
                Ok(value) => {
                    self.motion_value = round_hundredths(value);
                    tick.motion_value = Some(self.motion_value);
                    self.callbacks.update(self.motion_value);
                }
                Err(err) => outcome = Err(err),
            }
        }

        trace!(
            current = %self.current,
            velocity = %self.velocity,
            dragging = self.is_dragging,
            "spring step"
        );
        self.renderer.translate(self.current);
        outcome.map(|()| tick)
    }

    pub fn frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Place the offset directly, keeping the velocity
    pub fn set_current(&mut self, current: Vec2) {
        self.current = current;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Move the rest point. Unless a drag is in progress the target moves too.
    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
        if !self.is_dragging {
            self.target = anchor;
        }
    }

    /// Last reported motion value, `0` at the release point and `1` at rest
    pub fn motion_value(&self) -> f32 {
        self.motion_value
    }

    pub fn config(&self) -> SpringAnimationConfig {
        self.config
    }

    /// Replace the spring constants, leaving them untouched on error
    pub fn set_config(&mut self, config: SpringAnimationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: f32) -> Result<()> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(AnimationError::InvalidConfig(format!(
                "tolerance must be positive, got {tolerance}"
            )));
        }
        self.tolerance = tolerance;
        Ok(())
    }
}

impl std::fmt::Debug for SpringAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpringAnimator")
            .field("config", &self.config)
            .field("tolerance", &self.tolerance)
            .field("current", &self.current)
            .field("target", &self.target)
            .field("velocity", &self.velocity)
            .field("anchor", &self.anchor)
            .field("initial", &self.initial)
            .field("is_dragging", &self.is_dragging)
            .field("is_animating", &self.is_animating)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_gesture::ContactId;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn contact(is_down: bool, dx: f32, dy: f32) -> ContactRecord {
        ContactRecord {
            id: ContactId::Touch(0),
            is_down,
            position: Vec2::new(dx, dy),
            initial_position: Vec2::ZERO,
            delta: Vec2::new(dx, dy),
            velocity: Vec2::ZERO,
            force: 1.0,
            last_update_time: 0.0,
            updated: true,
        }
    }

    #[derive(Default)]
    struct Counters {
        started: Cell<u32>,
        completed: Cell<u32>,
        updates: RefCell<Vec<f32>>,
        rendered: RefCell<Vec<Vec2>>,
    }

    fn animator(config: SpringAnimationConfig) -> (SpringAnimator, Rc<Counters>) {
        let counters = Rc::new(Counters::default());
        let (start, update, complete, render) = (
            Rc::clone(&counters),
            Rc::clone(&counters),
            Rc::clone(&counters),
            Rc::clone(&counters),
        );
        let callbacks = SpringCallbacks::new()
            .on_start(move || start.started.set(start.started.get() + 1))
            .on_update(move |value| update.updates.borrow_mut().push(value))
            .on_complete(move || complete.completed.set(complete.completed.get() + 1));
        let spring = SpringAnimator::new(config, callbacks, move |offset: Vec2| {
            render.rendered.borrow_mut().push(offset)
        });
        (spring, counters)
    }

    #[test]
    fn test_settles_from_within_tolerance() {
        let (mut spring, counters) = animator(SpringAnimationConfig::default());
        spring.set_current(Vec2::new(0.01, 0.0));

        let tick = spring.start().unwrap();
        assert!(tick.settled);
        assert!(!spring.is_animating());
        assert!(!spring.frame_pending());
        assert_eq!(counters.completed.get(), 1);

        assert_eq!(spring.tick().unwrap(), None);
        assert_eq!(counters.completed.get(), 1);
    }

    #[test]
    fn test_dragging_follows_target_exactly() {
        let (mut spring, counters) = animator(SpringAnimationConfig::new(0.2, 0.95));
        spring.on_gesture(&contact(true, 0.0, 0.0)).unwrap();
        assert!(spring.is_animating());
        assert!(spring.is_dragging());

        for (dx, dy) in [(3.0, 1.0), (-7.5, 2.0), (40.0, -12.25)] {
            spring.on_gesture(&contact(true, dx, dy)).unwrap();
            let tick = spring.tick().unwrap().unwrap();
            assert_eq!(tick.position, Vec2::new(dx, dy));
            assert_eq!(spring.current(), spring.target());
            assert!(!tick.settled);
        }
        assert_eq!(counters.completed.get(), 0);
        assert_eq!(counters.rendered.borrow().last(), Some(&Vec2::new(40.0, -12.25)));
    }

    #[test]
    fn test_drag_is_offset_from_anchor() {
        let (mut spring, _) = animator(SpringAnimationConfig::default());
        spring.set_anchor(Vec2::new(5.0, 5.0));
        spring.on_gesture(&contact(true, 1.0, -1.0)).unwrap();
        assert_eq!(spring.target(), Vec2::new(6.0, 4.0));
        assert_eq!(spring.current(), Vec2::new(6.0, 4.0));
    }

    #[test]
    fn test_release_springs_back_and_settles_once() {
        let (mut spring, counters) = animator(SpringAnimationConfig::new(0.2, 0.95));

        spring.on_gesture(&contact(true, 0.0, 0.0)).unwrap();
        spring.on_gesture(&contact(true, 10.0, 0.0)).unwrap();
        spring.tick().unwrap();
        assert_eq!(spring.current(), Vec2::new(10.0, 0.0));

        spring.on_gesture(&contact(false, 10.0, 0.0)).unwrap();
        assert_eq!(counters.started.get(), 1);
        assert_eq!(spring.target(), Vec2::ZERO);
        assert!(!spring.is_dragging());

        let mut distances = Vec::new();
        let mut settled = false;
        for _ in 0..200 {
            let Some(tick) = spring.tick().unwrap() else {
                break;
            };
            distances.push(tick.position.distance());
            settled = tick.settled;
        }

        assert!(settled);
        assert!(!spring.is_animating());
        assert_eq!(counters.completed.get(), 1);
        assert_eq!(counters.started.get(), 1);
        assert!(spring.current().distance() < DEFAULT_TOLERANCE);

        // underdamped: overshoots, but never beyond the release point and
        // each swing is smaller than the last
        assert!(distances.iter().all(|d| *d < 10.0));
        let peaks: Vec<f32> = distances
            .windows(3)
            .filter(|w| w[1] >= w[0] && w[1] >= w[2])
            .map(|w| w[1])
            .collect();
        assert!(!peaks.is_empty());
        assert!(peaks.windows(2).all(|p| p[1] < p[0]));

        let updates = counters.updates.borrow();
        assert!(!updates.is_empty());
        assert!(updates.iter().all(|v| (0.0..=1.0).contains(v)));
        // first step from 10 lands at 8.1
        assert!((updates[0] - 0.19).abs() < 1e-6);
    }

    #[test]
    fn test_release_without_movement_does_not_fire_start() {
        let (mut spring, counters) = animator(SpringAnimationConfig::default());
        spring.on_gesture(&contact(true, 0.0, 0.0)).unwrap();
        spring.on_gesture(&contact(false, 0.0, 0.0)).unwrap();

        assert_eq!(counters.started.get(), 0);
        let tick = spring.tick().unwrap().unwrap();
        assert!(tick.settled);
        assert_eq!(tick.motion_value, None);
    }

    #[test]
    fn test_degenerate_motion_range_is_reported_after_render() {
        let (mut spring, counters) = animator(SpringAnimationConfig::default());
        spring.set_anchor(Vec2::new(0.0, 10.0));
        spring.on_gesture(&contact(true, 10.0, -10.0)).unwrap();
        // release at (10, 0): same distance from the origin as the anchor
        spring.on_gesture(&contact(false, 10.0, -10.0)).unwrap();

        let err = spring.tick().unwrap_err();
        assert_eq!(
            err,
            AnimationError::DegenerateRange {
                in_min: 10.0,
                in_max: 10.0
            }
        );
        assert_eq!(counters.rendered.borrow().last(), Some(&spring.current()));
        assert!(counters.updates.borrow().is_empty());
        assert!(spring.frame_pending());
    }

    #[test]
    fn test_stop_cancels_frames() {
        let (mut spring, _) = animator(SpringAnimationConfig::default());
        spring.on_gesture(&contact(true, 5.0, 0.0)).unwrap();
        assert!(spring.frame_pending());

        spring.stop();
        assert!(!spring.is_animating());
        assert!(!spring.frame_pending());
        assert_eq!(spring.tick().unwrap(), None);
    }

    #[test]
    fn test_set_config_rejects_bad_constants() {
        let (mut spring, _) = animator(SpringAnimationConfig::default());
        assert!(spring.set_config(SpringAnimationConfig::new(0.2, 1.0)).is_err());
        assert!(spring.set_config(SpringAnimationConfig::new(-0.1, 0.9)).is_err());
        assert_eq!(spring.config(), SpringAnimationConfig::default());

        spring.set_config(SpringAnimationConfig::new(0.3, 0.8)).unwrap();
        assert_eq!(spring.config().spring, 0.3);
    }

    #[test]
    fn test_set_tolerance() {
        let (mut spring, _) = animator(SpringAnimationConfig::default());
        assert!(spring.set_tolerance(0.0).is_err());
        assert_eq!(spring.tolerance(), DEFAULT_TOLERANCE);
        spring.set_tolerance(1.0).unwrap();
        assert_eq!(spring.tolerance(), 1.0);
    }
}
