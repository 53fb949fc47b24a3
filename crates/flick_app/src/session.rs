//! Gesture-to-spring session
//!
//! Owns a [`GestureInputHandler`] and a [`SpringAnimator`] and wires the
//! first into the second: every dispatched contact is fed to
//! [`SpringAnimator::on_gesture`]. The host forwards raw events to
//! [`GestureSession::handle_event`] and calls [`GestureSession::frame`] once
//! per display refresh.

use std::cell::RefCell;
use std::rc::Rc;

use flick_animation::{Renderer, SpringAnimator, SpringCallbacks, SpringTick};
use flick_gesture::{FrameReport, GestureInputHandler, ListenerId};
use flick_platform::{InputEvent, InputTarget};
use tracing::debug;

use crate::config::FlickConfig;
use crate::error::ConfigError;

/// What one call to [`GestureSession::frame`] did
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSummary {
    pub gesture: Option<FrameReport>,
    pub spring: Option<SpringTick>,
}

pub struct GestureSession {
    handler: GestureInputHandler,
    spring: Rc<RefCell<SpringAnimator>>,
    listener: ListenerId,
}

impl GestureSession {
    /// Build a session from a validated config
    pub fn new<R: Renderer + 'static>(
        config: &FlickConfig,
        callbacks: SpringCallbacks,
        renderer: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut animator =
            SpringAnimator::new(config.spring.animation_config(), callbacks, renderer);
        animator
            .set_tolerance(config.spring.tolerance)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        animator.set_anchor(config.spring.anchor());
        let spring = Rc::new(RefCell::new(animator));

        let mut handler = GestureInputHandler::new(config.input.target());
        handler
            .set_throttle(config.throttle.step, config.throttle.threshold)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        handler.set_velocity_mode(config.input.velocity.into());

        let sink = Rc::clone(&spring);
        let listener = handler.add_listener(
            move |contact| {
                sink.borrow_mut().on_gesture(contact)?;
                Ok(())
            },
            config.input.use_touch,
            config.input.use_mouse,
        );

        debug!(target = ?handler.target(), "gesture session created");
        Ok(Self {
            handler,
            spring,
            listener,
        })
    }

    /// Forward a raw event observed on `origin`. Returns whether it was used.
    pub fn handle_event(&mut self, origin: InputTarget, event: &InputEvent) -> bool {
        self.handler.handle_event(origin, event)
    }

    /// Run one display frame.
    ///
    /// The spring only steps if it had a frame requested before this one
    /// started; a spring started by this frame's dispatch waits for the next.
    pub fn frame(&mut self) -> flick_animation::Result<FrameSummary> {
        let spring_due = self.spring.borrow().frame_pending();
        let gesture = self.handler.on_frame();
        let spring = if spring_due {
            self.spring.borrow_mut().tick()?
        } else {
            None
        };
        Ok(FrameSummary { gesture, spring })
    }

    /// Whether either side has a frame requested
    pub fn is_active(&self) -> bool {
        self.handler.frame_pending() || self.spring.borrow().frame_pending()
    }

    /// Run frames until neither side requests one, at most `max_frames`.
    ///
    /// Returns the number of frames run.
    pub fn run_until_idle(&mut self, max_frames: usize) -> flick_animation::Result<usize> {
        let mut frames = 0;
        while frames < max_frames && self.is_active() {
            self.frame()?;
            frames += 1;
        }
        Ok(frames)
    }

    pub fn handler(&self) -> &GestureInputHandler {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut GestureInputHandler {
        &mut self.handler
    }

    /// Shared handle to the animator
    pub fn spring(&self) -> Rc<RefCell<SpringAnimator>> {
        Rc::clone(&self.spring)
    }

    /// Stop feeding contacts to the spring
    pub fn detach(&mut self) -> bool {
        self.handler.remove_listener(self.listener)
    }
}

impl std::fmt::Debug for GestureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureSession")
            .field("handler", &self.handler)
            .field("spring", &self.spring)
            .finish()
    }
}
