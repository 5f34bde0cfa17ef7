//! Search ranges of the three dribble generators

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Short dribble: turn to one of a ring of directions, then dash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_short_range"))]
pub struct ShortDribbleConfig {
    /// Number of body directions tried around the current body (기본: 12)
    #[validate(range(min = 1, max = 72))]
    pub angle_divisions: u32,
    /// Directions needing more turns than this are skipped
    #[validate(range(max = 5))]
    pub max_turns: u32,
    #[validate(range(min = 1))]
    pub min_dash: u32,
    #[validate(range(min = 1, max = 20))]
    pub max_dash: u32,
    /// Residual facing error accepted after the last turn (degrees)
    #[validate(range(min = 0.0, max = 90.0))]
    pub turn_tolerance_deg: f64,
}

impl Default for ShortDribbleConfig {
    fn default() -> Self {
        Self {
            angle_divisions: 12,
            max_turns: 2,
            min_dash: 2,
            max_dash: 4,
            turn_tolerance_deg: 10.0,
        }
    }
}

fn validate_short_range(c: &ShortDribbleConfig) -> Result<(), ValidationError> {
    check_range(c.min_dash, c.max_dash)
}

/// Keep dribble: body fixed, grow the plan one dash at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_keep_range"))]
pub struct KeepDribbleConfig {
    /// Dash directions relative to the body (degrees, snapped to the dash grid)
    #[validate(length(min = 1))]
    pub relative_dash_dirs_deg: Vec<f64>,
    /// Longest dash-only plan (ball left rolling, no kick)
    #[validate(range(max = 20))]
    pub max_dash_only_steps: u32,
    #[validate(range(min = 1))]
    pub min_kick_dash: u32,
    /// Longest kick-first plan
    #[validate(range(min = 1, max = 20))]
    pub max_kick_dash: u32,
}

impl Default for KeepDribbleConfig {
    fn default() -> Self {
        Self {
            relative_dash_dirs_deg: vec![0.0, 45.0, -45.0],
            max_dash_only_steps: 6,
            min_kick_dash: 1,
            max_kick_dash: 8,
        }
    }
}

fn validate_keep_range(c: &KeepDribbleConfig) -> Result<(), ValidationError> {
    check_range(c.min_kick_dash, c.max_kick_dash)
}

/// Omnidirectional dribble: dash without turning, trap the ball at an angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_omni_range"))]
pub struct OmniDribbleConfig {
    /// Dash directions around the body (기본: 8, i.e. the 45deg grid)
    #[validate(range(min = 1, max = 72))]
    pub dash_dir_divisions: u32,
    /// Trap angles around the dash direction (기본: 8)
    #[validate(range(min = 1, max = 72))]
    pub trap_angle_divisions: u32,
    #[validate(range(min = 1))]
    pub min_dash: u32,
    #[validate(range(min = 1, max = 20))]
    pub max_dash: u32,
}

impl Default for OmniDribbleConfig {
    fn default() -> Self {
        Self {
            dash_dir_divisions: 8,
            trap_angle_divisions: 8,
            min_dash: 3,
            max_dash: 5,
        }
    }
}

fn validate_omni_range(c: &OmniDribbleConfig) -> Result<(), ValidationError> {
    check_range(c.min_dash, c.max_dash)
}

fn check_range(min: u32, max: u32) -> Result<(), ValidationError> {
    if min > max {
        return Err(ValidationError::new("min_dash_exceeds_max_dash"));
    }
    Ok(())
}
