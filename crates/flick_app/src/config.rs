//! Flick configuration file handling
//!
//! A `flick.toml` tunes the spring, the dispatch throttle and the input
//! sources. Every key is optional:
//!
//! ```toml
//! [spring]
//! spring = 0.2
//! friction = 0.95
//! tolerance = 0.05
//! anchor_x = 0.0
//! anchor_y = 0.0
//!
//! [throttle]
//! step = 1
//! threshold = 2
//!
//! [input]
//! use_mouse = true
//! use_touch = true
//! scoped = false
//! element_id = 0
//! velocity = "legacy"
//! ```

use std::fs;
use std::path::Path;

use flick_animation::SpringAnimationConfig;
use flick_core::Vec2;
use flick_gesture::{Throttle, VelocityMode};
use flick_platform::{ElementId, InputTarget};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlickConfig {
    pub spring: SpringSection,
    pub throttle: ThrottleSection,
    pub input: InputSection,
}

/// `[spring]` table
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpringSection {
    pub spring: f32,
    pub friction: f32,
    /// Settle distance from the anchor
    pub tolerance: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
}

impl Default for SpringSection {
    fn default() -> Self {
        Self {
            spring: 0.2,
            friction: 0.95,
            tolerance: flick_animation::DEFAULT_TOLERANCE,
            anchor_x: 0.0,
            anchor_y: 0.0,
        }
    }
}

impl SpringSection {
    pub fn animation_config(&self) -> SpringAnimationConfig {
        SpringAnimationConfig::new(self.spring, self.friction)
    }

    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.anchor_x, self.anchor_y)
    }
}

/// `[throttle]` table
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThrottleSection {
    pub step: u32,
    pub threshold: u32,
}

impl Default for ThrottleSection {
    fn default() -> Self {
        let throttle = Throttle::default();
        Self {
            step: throttle.step(),
            threshold: throttle.threshold(),
        }
    }
}

/// `[input]` table
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputSection {
    pub use_mouse: bool,
    pub use_touch: bool,
    /// Listen on element `element_id` instead of the whole page
    pub scoped: bool,
    pub element_id: u64,
    pub velocity: VelocitySetting,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            use_mouse: true,
            use_touch: true,
            scoped: false,
            element_id: 0,
            velocity: VelocitySetting::Legacy,
        }
    }
}

impl InputSection {
    /// Surface the gesture handler binds to
    pub fn target(&self) -> InputTarget {
        if self.scoped {
            InputTarget::Element(ElementId(self.element_id))
        } else {
            InputTarget::Root
        }
    }
}

/// Serialized form of [`VelocityMode`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocitySetting {
    #[default]
    Legacy,
    Instantaneous,
}

impl From<VelocitySetting> for VelocityMode {
    fn from(setting: VelocitySetting) -> Self {
        match setting {
            VelocitySetting::Legacy => VelocityMode::Legacy,
            VelocitySetting::Instantaneous => VelocityMode::Instantaneous,
        }
    }
}

impl FlickConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FlickConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Throttle::new(self.throttle.step, self.throttle.threshold)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        self.spring
            .animation_config()
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        if !(self.spring.tolerance.is_finite() && self.spring.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be positive, got {}",
                self.spring.tolerance
            )));
        }

        if !self.input.use_mouse && !self.input.use_touch {
            return Err(ConfigError::Invalid(
                "at least one of use_mouse and use_touch must be enabled".to_string(),
            ));
        }

        Ok(())
    }
}
