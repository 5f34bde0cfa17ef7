//! Player kinematic profile
//!
//! The single authority for per-player locomotion numbers: top speed,
//! velocity decay, turn inertia, dash power rate and ball control radius.
//! Both the agent's stepper and the adversary reach estimate read from here,
//! so the two never drift apart.

use crate::engine::config::{geometric_sum, ServerParams};
use crate::engine::physics_constants::player::*;
use crate::engine::types::Vec2;
use serde::{Deserialize, Serialize};

/// Physical limits of one player type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerType {
    /// Speed cap (m/cycle)
    pub player_speed_max: f64,
    /// Per-cycle velocity decay
    pub player_decay: f64,
    /// Turn inertia: higher = less turn per moment at speed
    pub inertia_moment: f64,
    /// Dash power -> acceleration
    pub dash_power_rate: f64,
    /// Body radius
    pub player_size: f64,
    /// Ball control margin beyond the body
    pub kickable_margin: f64,
    pub effort_max: f64,
    pub effort_min: f64,
    /// Stamina recovered per cycle at full recovery
    pub stamina_inc_max: f64,
    /// Stamina usable below zero for the last dashes
    pub extra_stamina: f64,
}

impl Default for PlayerType {
    fn default() -> Self {
        Self {
            player_speed_max: SPEED_MAX,
            player_decay: DECAY,
            inertia_moment: INERTIA_MOMENT,
            dash_power_rate: DASH_POWER_RATE,
            player_size: SIZE_M,
            kickable_margin: KICKABLE_MARGIN_M,
            effort_max: EFFORT_MAX,
            effort_min: EFFORT_MIN,
            stamina_inc_max: STAMINA_INC_MAX,
            extra_stamina: EXTRA_STAMINA,
        }
    }
}

impl PlayerType {
    /// Distance within which the player can act on the ball.
    #[inline]
    pub fn kickable_area(&self, sp: &ServerParams) -> f64 {
        self.player_size + self.kickable_margin + sp.ball_size
    }

    /// Degrees actually turned for `moment` at the given speed.
    #[inline]
    pub fn effective_turn(&self, moment: f64, speed: f64) -> f64 {
        moment / (1.0 + self.inertia_moment * speed)
    }

    /// Moment needed to turn `angle` degrees at the given speed.
    #[inline]
    pub fn moment_for_turn(&self, angle: f64, speed: f64) -> f64 {
        angle * (1.0 + self.inertia_moment * speed)
    }

    /// Terminal speed reachable under full dashes, capped by `player_speed_max`.
    pub fn real_speed_max(&self, sp: &ServerParams) -> f64 {
        let accel = sp.max_dash_power * self.dash_power_rate * self.effort_max;
        let decay_gap = (1.0 - self.player_decay).max(1e-6);
        (accel / decay_gap).min(self.player_speed_max)
    }

    /// Cycles needed to cover `dist` at top speed (0 for non-positive distances).
    pub fn cycles_to_reach_distance(&self, dist: f64, sp: &ServerParams) -> i32 {
        if dist <= 0.0 {
            return 0;
        }
        let speed = self.real_speed_max(sp).max(1e-3);
        // epsilon keeps exact multiples of the speed from rounding up a cycle
        (dist / speed - 1e-9).ceil().max(0.0) as i32
    }

    /// Displacement of a coasting player after `n_step` cycles.
    #[inline]
    pub fn inertia_travel(&self, vel: &Vec2, n_step: u32) -> Vec2 {
        vel * geometric_sum(self.player_decay, n_step)
    }

    /// Position of a coasting player after `n_step` cycles.
    #[inline]
    pub fn inertia_point(&self, pos: &Vec2, vel: &Vec2, n_step: u32) -> Vec2 {
        pos + self.inertia_travel(vel, n_step)
    }

    /// Acceleration of a full-power straight dash at the given effort.
    #[inline]
    pub fn max_dash_accel(&self, sp: &ServerParams, effort: f64) -> f64 {
        sp.max_dash_power * self.dash_power_rate * effort
    }
}
