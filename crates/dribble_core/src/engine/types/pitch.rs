//! Pitch geometry
//!
//! Playable rectangle and the two penalty areas. The agent attacks +x, so the
//! area the adversaries defend is the one at `x = +half_length`.

use super::vec2::Vec2;
use crate::engine::config::ServerParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch {
    pub half_length: f64,
    pub half_width: f64,
    pub penalty_area_length: f64,
    pub penalty_area_half_width: f64,
}

impl Pitch {
    pub fn from_server(sp: &ServerParams) -> Self {
        Self {
            half_length: sp.pitch_half_length,
            half_width: sp.pitch_half_width,
            penalty_area_length: sp.penalty_area_length,
            penalty_area_half_width: sp.penalty_area_half_width,
        }
    }

    /// Inside the playable rectangle shrunk by `margin` on every side.
    #[inline]
    pub fn contains(&self, pos: &Vec2, margin: f64) -> bool {
        pos.x.abs() <= self.half_length - margin && pos.y.abs() <= self.half_width - margin
    }

    /// Inside the penalty area the adversaries defend (their goal, +x).
    #[inline]
    pub fn in_their_penalty_area(&self, pos: &Vec2) -> bool {
        pos.x > self.half_length - self.penalty_area_length
            && pos.x <= self.half_length
            && pos.y.abs() < self.penalty_area_half_width
    }

    /// Inside our own penalty area (-x).
    #[inline]
    pub fn in_our_penalty_area(&self, pos: &Vec2) -> bool {
        pos.x < -(self.half_length - self.penalty_area_length)
            && pos.x >= -self.half_length
            && pos.y.abs() < self.penalty_area_half_width
    }

    /// Within `depth` meters of either goal line.
    #[inline]
    pub fn near_either_goal(&self, pos: &Vec2, depth: f64) -> bool {
        pos.x.abs() > self.half_length - depth
    }
}

impl Default for Pitch {
    fn default() -> Self {
        Self::from_server(&ServerParams::default())
    }
}
