//! Stamina Configuration

use crate::engine::physics_constants::stamina;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stamina 시스템 파라미터 (server side recovery/effort model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct StaminaConfig {
    // === Pool ===
    /// Stamina pool size (기본: 8000)
    #[validate(range(min = 1.0))]
    pub stamina_max: f64,
    /// Total recoverable stamina for the half (기본: 130600)
    #[validate(range(min = 0.0))]
    pub stamina_capacity: f64,

    // === Recovery ===
    /// Fraction of `stamina_max` below which recovery decays (기본: 0.3)
    #[validate(range(min = 0.0, max = 1.0))]
    pub recover_dec_thr: f64,
    #[validate(range(min = 0.0))]
    pub recover_dec: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub recover_min: f64,

    // === Effort ===
    /// Fraction of `stamina_max` below which effort decays (기본: 0.3)
    #[validate(range(min = 0.0, max = 1.0))]
    pub effort_dec_thr: f64,
    #[validate(range(min = 0.0))]
    pub effort_dec: f64,
    /// Fraction of `stamina_max` above which effort recovers (기본: 0.6)
    #[validate(range(min = 0.0, max = 1.0))]
    pub effort_inc_thr: f64,
    #[validate(range(min = 0.0))]
    pub effort_inc: f64,

    // === Planner policy ===
    /// Stamina kept in reserve above the recovery threshold when planning dashes (기본: 300)
    #[validate(range(min = 0.0))]
    pub safety_reserve: f64,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            stamina_max: stamina::MAX,
            stamina_capacity: stamina::CAPACITY,
            recover_dec_thr: stamina::RECOVER_DEC_THR,
            recover_dec: stamina::RECOVER_DEC,
            recover_min: stamina::RECOVER_MIN,
            effort_dec_thr: stamina::EFFORT_DEC_THR,
            effort_dec: stamina::EFFORT_DEC,
            effort_inc_thr: stamina::EFFORT_INC_THR,
            effort_inc: stamina::EFFORT_INC,
            safety_reserve: 300.0,
        }
    }
}

impl StaminaConfig {
    /// Absolute stamina level under which recovery starts to decay.
    #[inline]
    pub fn recover_dec_thr_value(&self) -> f64 {
        self.recover_dec_thr * self.stamina_max
    }
}
