//! Commitment (plan execution) Configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-cycle re-validation parameters of a committed plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct CommitmentConfig {
    /// Ball within this distance of the declared target completes the plan (meters)
    #[validate(range(min = 0.0))]
    pub target_tolerance_m: f64,
    /// How many upcoming cycles are re-classified every execution
    #[validate(range(min = 1, max = 5))]
    pub intercept_lookahead: u32,
    /// Added to an opponent's seizing radius for the remaining-path check (meters)
    #[validate(range(min = 0.0))]
    pub path_envelope_margin_m: f64,
    /// Run the geometric remaining-path check
    pub check_path: bool,
}

impl Default for CommitmentConfig {
    fn default() -> Self {
        Self {
            target_tolerance_m: 0.5,
            intercept_lookahead: 2,
            path_envelope_margin_m: 0.3,
            check_path: true,
        }
    }
}
