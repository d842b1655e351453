//! World-space vector math for strokes and canvas placement

use std::ops::{Add, AddAssign, Mul, Sub};
use serde::{Serialize, Deserialize};

/// 2D world-space vector
///
/// Canvases live in the XY plane, so pointer positions and stroke points are
/// plain 2D vectors. Persistence widens them to 3 floats with z = 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).len()
    }

    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        Vec2 {
            x: self.x / l,
            y: self.y / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Counter-clockwise perpendicular
    pub fn perp(self) -> Vec2 {
        Vec2 { x: -self.y, y: self.x }
    }

    /// Project `self` onto `onto`. Projecting onto a zero vector gives zero.
    pub fn project(self, onto: Vec2) -> Vec2 {
        let denom = onto.dot(onto);
        if denom < f32::EPSILON {
            return Vec2::ZERO;
        }
        onto.scale(self.dot(onto) / denom)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_onto_axis() {
        let p = Vec2::new(3.0, 4.0).project(Vec2::new(2.0, 0.0));
        assert_eq!(p, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_project_onto_zero_is_zero() {
        assert_eq!(Vec2::new(1.0, 1.0).project(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_perp_is_orthogonal() {
        let v = Vec2::new(0.6, 0.8);
        assert!(v.dot(v.perp()).abs() < 1e-6);
        assert!((v.perp().len() - 1.0).abs() < 1e-6);
    }
}
