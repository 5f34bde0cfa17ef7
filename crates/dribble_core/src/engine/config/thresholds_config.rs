//! Centralized Thresholds Configuration
//!
//! Every distance/margin the safety classifier and the branch checks consult
//! lives here instead of in the control flow, so each table can be tuned and
//! tested on its own.
//!
//! ## Threshold Categories
//!
//! | Category | Description |
//! |----------|-------------|
//! | Safety | Opponent cutoff, tier margins, unseen-opponent discount |
//! | Feasibility | Field margin, collision and ball-control distances |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Safety classifier thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_tier_margins"))]
pub struct SafetyThresholds {
    /// Opponents farther than this from the agent are ignored (meters)
    #[validate(range(min = 0.0))]
    pub opponent_cutoff_m: f64,
    /// Reach cycles within `step + dangerous_margin` are Dangerous
    #[validate(range(min = 0))]
    pub dangerous_margin: i32,
    /// Reach cycles within `step + maybe_dangerous_margin` are MaybeDangerous
    #[validate(range(min = 0))]
    pub maybe_dangerous_margin: i32,
    /// Unobserved-opponent discount
    #[validate]
    pub discount: ConfidenceDiscount,
    /// Smallest facing error an opponent must turn away before dashing (degrees)
    #[validate(range(min = 0.0, max = 180.0))]
    pub min_turn_margin_deg: f64,
    /// Extra distance subtracted from the opponent's gap before converting to cycles
    #[validate(range(min = 0.0))]
    pub reach_slack_m: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            opponent_cutoff_m: 20.0,
            dangerous_margin: 3,
            maybe_dangerous_margin: 5,
            discount: ConfidenceDiscount::default(),
            min_turn_margin_deg: 15.0,
            reach_slack_m: 0.0,
        }
    }
}

fn validate_tier_margins(t: &SafetyThresholds) -> Result<(), ValidationError> {
    if t.dangerous_margin > t.maybe_dangerous_margin {
        return Err(ValidationError::new("dangerous_margin_exceeds_maybe_dangerous_margin"));
    }
    Ok(())
}

/// Cycles subtracted from an opponent's reach estimate for every cycle it went unseen.
///
/// The cap is larger in open midfield than near either goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct ConfidenceDiscount {
    /// Cycles of discount per unseen cycle
    #[validate(range(min = 0.0))]
    pub per_unseen_cycle: f64,
    /// Discount cap while the ball is in midfield
    #[validate(range(min = 0))]
    pub midfield_cap: i32,
    /// Discount cap while the ball is near either goal
    #[validate(range(min = 0))]
    pub near_goal_cap: i32,
    /// Depth from the goal line that counts as "near goal" (meters)
    #[validate(range(min = 0.0))]
    pub near_goal_depth_m: f64,
}

impl Default for ConfidenceDiscount {
    fn default() -> Self {
        Self {
            per_unseen_cycle: 1.0,
            midfield_cap: 3,
            near_goal_cap: 1,
            near_goal_depth_m: 16.5,
        }
    }
}

/// Branch feasibility thresholds shared by all generators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct FeasibilityThresholds {
    /// Ball must stay this far inside the touch/goal lines (meters)
    #[validate(range(min = 0.0))]
    pub field_margin_m: f64,
    /// Added to player size + ball size to form the collision distance
    #[validate(range(min = 0.0))]
    pub collision_buffer_m: f64,
    /// Kickable-area shrink when the ball ends in front of the body
    #[validate(range(min = 0.0))]
    pub control_front_buffer_m: f64,
    /// Kickable-area shrink when the ball ends behind the body
    #[validate(range(min = 0.0))]
    pub control_back_buffer_m: f64,
    /// Extra shrink per planned dash
    #[validate(range(min = 0.0))]
    pub control_tighten_per_dash_m: f64,
    /// Share of the kickable margin added to the trap distance
    #[validate(range(min = 0.0, max = 1.0))]
    pub trap_margin_ratio: f64,
}

impl Default for FeasibilityThresholds {
    fn default() -> Self {
        Self {
            field_margin_m: 1.0,
            collision_buffer_m: 0.1,
            control_front_buffer_m: 0.15,
            control_back_buffer_m: 0.3,
            control_tighten_per_dash_m: 0.03,
            trap_margin_ratio: 0.2,
        }
    }
}
