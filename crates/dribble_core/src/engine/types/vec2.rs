//! 2D vector helpers on top of `nalgebra::Vector2<f64>`
//!
//! Pitch coordinates are meters with the origin at the center spot,
//! +x toward the goal the agent attacks.

use super::angle::AngleDeg;
use nalgebra::Vector2;

pub type Vec2 = Vector2<f64>;

const EPS: f64 = 1e-9;

/// Vector of length `r` pointing at `dir`.
#[inline]
pub fn polar(r: f64, dir: AngleDeg) -> Vec2 {
    Vec2::new(r * dir.cos(), r * dir.sin())
}

/// Extension methods used all over the planner.
pub trait VecExt {
    /// Direction of the vector. Zero vectors point at 0deg.
    fn th(&self) -> AngleDeg;
    /// Rotate counter-clockwise by `angle`.
    fn rotated(&self, angle: AngleDeg) -> Vec2;
    /// Same direction, new length. Zero vectors stay zero.
    fn with_length(&self, len: f64) -> Vec2;
    /// Euclidean distance to `other`.
    fn dist(&self, other: &Vec2) -> f64;
    /// Squared distance to `other`.
    fn dist2(&self, other: &Vec2) -> f64;
}

impl VecExt for Vec2 {
    #[inline]
    fn th(&self) -> AngleDeg {
        if self.x.abs() < EPS && self.y.abs() < EPS {
            AngleDeg::ZERO
        } else {
            AngleDeg::from_radians(self.y.atan2(self.x))
        }
    }

    #[inline]
    fn rotated(&self, angle: AngleDeg) -> Vec2 {
        let (s, c) = (angle.sin(), angle.cos());
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    #[inline]
    fn with_length(&self, len: f64) -> Vec2 {
        let n = self.norm();
        if n < EPS {
            Vec2::zeros()
        } else {
            self * (len / n)
        }
    }

    #[inline]
    fn dist(&self, other: &Vec2) -> f64 {
        (self - other).norm()
    }

    #[inline]
    fn dist2(&self, other: &Vec2) -> f64 {
        (self - other).norm_squared()
    }
}

/// Shortest distance from `point` to the segment `a`..`b`.
pub fn distance_to_segment(point: &Vec2, a: &Vec2, b: &Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < EPS {
        return point.dist(a);
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    point.dist(&closest)
}
