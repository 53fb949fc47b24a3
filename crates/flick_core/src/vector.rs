//! 2D vector value type
//!
//! Positions, deltas and velocities all share [`Vec2`]. Every operation
//! returns a new value and leaves its operands untouched.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// 2D vector in surface (page) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from the origin
    pub fn distance(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Distance between two points
    pub fn distance_to(&self, other: Vec2) -> f32 {
        (*self - other).distance()
    }

    /// Component-wise product
    pub fn mul_components(self, rhs: Vec2) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }

    /// Component-wise quotient
    ///
    /// Both components of `rhs` must be nonzero. A zero component yields an
    /// infinite or NaN result; use [`Vec2::checked_div`] when the divisor is
    /// not known to be safe.
    pub fn div_components(self, rhs: Vec2) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }

    /// Component-wise quotient, or `None` if either divisor component is zero
    pub fn checked_div(self, rhs: Vec2) -> Option<Self> {
        if rhs.x == 0.0 || rhs.y == 0.0 {
            None
        } else {
            Some(self.div_components(rhs))
        }
    }

    /// Returns true if the vector has nonzero length
    pub fn is_nonzero(&self) -> bool {
        self.distance() > 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        self.mul_components(rhs)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise division. Divisor components must be nonzero.
impl Div for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: Vec2) -> Vec2 {
        self.div_components(rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point (x: {:.0}, y: {:.0})", self.x, self.y)
    }
}
