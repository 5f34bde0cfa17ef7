//! Physics constants of the simulated soccer server
//!
//! Stock values of the 2D simulator the agent plays in. Config structs take
//! their `Default` from here, so presets only override what they change.

/// Field dimensions (meters, origin at the center spot)
pub mod field {
    /// Half of the pitch length
    pub const HALF_LENGTH_M: f64 = 52.5;
    /// Half of the pitch width
    pub const HALF_WIDTH_M: f64 = 34.0;
    /// Penalty area depth measured from the goal line
    pub const PENALTY_AREA_LENGTH_M: f64 = 16.5;
    /// Half of the penalty area width
    pub const PENALTY_AREA_HALF_WIDTH_M: f64 = 20.16;
}

/// Ball model
pub mod ball {
    /// Ball radius
    pub const SIZE_M: f64 = 0.085;
    /// Per-cycle velocity decay
    pub const DECAY: f64 = 0.94;
    /// Speed cap (m/cycle)
    pub const SPEED_MAX: f64 = 3.0;
    /// Max per-cycle acceleration a kick may add
    pub const ACCEL_MAX: f64 = 2.7;
}

/// Actuator limits
pub mod actuator {
    pub const MAX_POWER: f64 = 100.0;
    pub const MIN_POWER: f64 = -100.0;
    pub const MAX_DASH_POWER: f64 = 100.0;
    pub const MIN_DASH_POWER: f64 = -100.0;
    /// Dash directions are quantized to this step
    pub const DASH_ANGLE_STEP_DEG: f64 = 45.0;
    pub const MIN_DASH_ANGLE_DEG: f64 = -180.0;
    pub const MAX_DASH_ANGLE_DEG: f64 = 180.0;
    /// Dash efficiency at 90deg
    pub const SIDE_DASH_RATE: f64 = 0.4;
    /// Dash efficiency at 180deg
    pub const BACK_DASH_RATE: f64 = 0.6;
    pub const MAX_MOMENT: f64 = 180.0;
    pub const MIN_MOMENT: f64 = -180.0;
    pub const KICK_POWER_RATE: f64 = 0.027;
}

/// Goalkeeper / tackle
pub mod keeper {
    /// Goalie catchable radius (from 1.2 x 1.0 catch box)
    pub const CATCHABLE_AREA_M: f64 = 1.3;
    /// Cycles a player stays frozen after a tackle
    pub const TACKLE_CYCLES: u32 = 10;
}

/// Heterogeneous player type defaults (type 0)
pub mod player {
    pub const SPEED_MAX: f64 = 1.05;
    pub const DECAY: f64 = 0.4;
    pub const INERTIA_MOMENT: f64 = 5.0;
    pub const DASH_POWER_RATE: f64 = 0.006;
    pub const SIZE_M: f64 = 0.3;
    pub const KICKABLE_MARGIN_M: f64 = 0.7;
    pub const EFFORT_MAX: f64 = 1.0;
    pub const EFFORT_MIN: f64 = 0.6;
    pub const STAMINA_INC_MAX: f64 = 45.0;
    pub const EXTRA_STAMINA: f64 = 50.0;
}

/// Stamina model
pub mod stamina {
    pub const MAX: f64 = 8000.0;
    pub const CAPACITY: f64 = 130_600.0;
    /// Recovery starts dropping below this fraction of MAX
    pub const RECOVER_DEC_THR: f64 = 0.3;
    pub const RECOVER_DEC: f64 = 0.002;
    pub const RECOVER_MIN: f64 = 0.5;
    /// Effort starts dropping below this fraction of MAX
    pub const EFFORT_DEC_THR: f64 = 0.3;
    pub const EFFORT_DEC: f64 = 0.005;
    /// Effort recovers above this fraction of MAX
    pub const EFFORT_INC_THR: f64 = 0.6;
    pub const EFFORT_INC: f64 = 0.01;
}
