//! Flick Animation
//!
//! Spring-back animation for dragged offsets.
//!
//! # Features
//!
//! - **Direct follow while dragging**: the offset tracks the contact delta
//!   with no lag
//! - **Damped spring on release**: per-frame semi-implicit Euler step back to
//!   the anchor
//! - **Motion value**: progress from the release point (`0`) to rest (`1`),
//!   rounded to hundredths
//! - **Lifecycle hooks**: start on fling, update per step, complete on settle
//!
//! # Example
//!
//! ```rust
//! use flick_animation::{SpringAnimationConfig, SpringAnimator, SpringCallbacks};
//! use flick_core::Vec2;
//!
//! let mut spring = SpringAnimator::new(
//!     SpringAnimationConfig::new(0.2, 0.95),
//!     SpringCallbacks::new().on_complete(|| println!("at rest")),
//!     |offset: Vec2| println!("translate to {offset}"),
//! );
//! spring.set_current(Vec2::new(20.0, 0.0));
//! spring.start().unwrap();
//!
//! while let Some(tick) = spring.tick().unwrap() {
//!     if tick.settled {
//!         break;
//!     }
//! }
//! assert!(!spring.is_animating());
//! ```

pub mod error;
pub mod interpolate;
pub mod spring;

pub use error::{AnimationError, Result};
pub use interpolate::{remap, round_hundredths};
pub use spring::{
    Renderer, SpringAnimationConfig, SpringAnimator, SpringCallbacks, SpringTick,
    DEFAULT_TOLERANCE,
};
