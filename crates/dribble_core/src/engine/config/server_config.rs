//! Server physics parameters

use crate::engine::physics_constants::{actuator, ball, field, keeper};
use crate::engine::types::AngleDeg;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Physics of the simulated server: field, ball and actuator limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct ServerParams {
    // === Field ===
    #[validate(range(min = 1.0))]
    pub pitch_half_length: f64,
    #[validate(range(min = 1.0))]
    pub pitch_half_width: f64,
    #[validate(range(min = 0.0))]
    pub penalty_area_length: f64,
    #[validate(range(min = 0.0))]
    pub penalty_area_half_width: f64,

    // === Ball ===
    #[validate(range(min = 0.0))]
    pub ball_size: f64,
    /// Per-cycle ball velocity decay (must stay below 1)
    #[validate(range(min = 0.0, max = 0.999))]
    pub ball_decay: f64,
    #[validate(range(min = 0.0))]
    pub ball_speed_max: f64,
    #[validate(range(min = 0.0))]
    pub ball_accel_max: f64,

    // === Kick / dash / turn ===
    #[validate(range(min = 0.0))]
    pub max_power: f64,
    pub min_power: f64,
    #[validate(range(min = 0.0))]
    pub max_dash_power: f64,
    pub min_dash_power: f64,
    /// Dash commands are only accepted on this angular grid
    #[validate(range(min = 0.0, max = 180.0))]
    pub dash_angle_step: f64,
    pub min_dash_angle: f64,
    pub max_dash_angle: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub side_dash_rate: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub back_dash_rate: f64,
    #[validate(range(min = 0.0))]
    pub max_moment: f64,
    pub min_moment: f64,
    #[validate(range(min = 0.0))]
    pub kick_power_rate: f64,

    // === Goalie / tackle ===
    #[validate(range(min = 0.0))]
    pub catchable_area: f64,
    pub tackle_cycles: u32,
}

impl Default for ServerParams {
    fn default() -> Self {
        Self {
            pitch_half_length: field::HALF_LENGTH_M,
            pitch_half_width: field::HALF_WIDTH_M,
            penalty_area_length: field::PENALTY_AREA_LENGTH_M,
            penalty_area_half_width: field::PENALTY_AREA_HALF_WIDTH_M,

            ball_size: ball::SIZE_M,
            ball_decay: ball::DECAY,
            ball_speed_max: ball::SPEED_MAX,
            ball_accel_max: ball::ACCEL_MAX,

            max_power: actuator::MAX_POWER,
            min_power: actuator::MIN_POWER,
            max_dash_power: actuator::MAX_DASH_POWER,
            min_dash_power: actuator::MIN_DASH_POWER,
            dash_angle_step: actuator::DASH_ANGLE_STEP_DEG,
            min_dash_angle: actuator::MIN_DASH_ANGLE_DEG,
            max_dash_angle: actuator::MAX_DASH_ANGLE_DEG,
            side_dash_rate: actuator::SIDE_DASH_RATE,
            back_dash_rate: actuator::BACK_DASH_RATE,
            max_moment: actuator::MAX_MOMENT,
            min_moment: actuator::MIN_MOMENT,
            kick_power_rate: actuator::KICK_POWER_RATE,

            catchable_area: keeper::CATCHABLE_AREA_M,
            tackle_cycles: keeper::TACKLE_CYCLES,
        }
    }
}

impl ServerParams {
    /// Snap a body-relative dash direction onto the server's direction grid.
    pub fn discretize_dash_angle(&self, dir: AngleDeg) -> AngleDeg {
        let d = dir.degrees().clamp(self.min_dash_angle, self.max_dash_angle);
        if self.dash_angle_step < f64::EPSILON {
            return AngleDeg::new(d);
        }
        AngleDeg::new((d / self.dash_angle_step).round() * self.dash_angle_step)
    }

    /// Efficiency of a dash issued at `dir` relative to the body.
    ///
    /// 1.0 straight ahead, `side_dash_rate` at 90deg, `back_dash_rate` at 180deg.
    pub fn dash_dir_rate(&self, dir: AngleDeg) -> f64 {
        let a = dir.abs();
        if a > 90.0 {
            self.back_dash_rate - (self.back_dash_rate - self.side_dash_rate) * (1.0 - (a - 90.0) / 90.0)
        } else {
            self.side_dash_rate + (1.0 - self.side_dash_rate) * (1.0 - a / 90.0)
        }
    }

    /// Clamp a dash power into the actuator range.
    #[inline]
    pub fn normalize_dash_power(&self, power: f64) -> f64 {
        power.clamp(self.min_dash_power, self.max_dash_power)
    }

    /// Clamp a turn moment into the actuator range.
    #[inline]
    pub fn normalize_moment(&self, moment: f64) -> f64 {
        moment.clamp(self.min_moment, self.max_moment)
    }

    /// Sum of `decay^k` for `k in 0..n`: distance factor of an undisturbed roll.
    pub fn ball_travel_factor(&self, n_step: u32) -> f64 {
        geometric_sum(self.ball_decay, n_step)
    }
}

/// `1 + d + d^2 + ... + d^(n-1)`, safe for `d == 1`.
pub fn geometric_sum(decay: f64, n: u32) -> f64 {
    if (1.0 - decay).abs() < 1e-9 {
        return n as f64;
    }
    (1.0 - decay.powi(n as i32)) / (1.0 - decay)
}
