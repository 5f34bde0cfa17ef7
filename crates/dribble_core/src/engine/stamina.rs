//! Stamina (energy) model
//!
//! Mirrors the server's per-cycle bookkeeping closely enough for planning:
//! dashes drain stamina, low stamina erodes effort and recovery, and the
//! planner never spends below the recovery threshold plus a reserve.

use crate::engine::config::{ServerParams, StaminaConfig};
use crate::engine::player_type::PlayerType;
use crate::engine::physics_constants::stamina as stock;
use serde::{Deserialize, Serialize};

/// Energy state of one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaModel {
    pub stamina: f64,
    /// Multiplier on dash acceleration (effort_min..=effort_max)
    pub effort: f64,
    /// Multiplier on per-cycle recovery (recover_min..=1)
    pub recovery: f64,
    /// Stamina still recoverable this half
    pub capacity: f64,
}

impl Default for StaminaModel {
    fn default() -> Self {
        Self {
            stamina: stock::MAX,
            effort: 1.0,
            recovery: 1.0,
            capacity: stock::CAPACITY,
        }
    }
}

impl StaminaModel {
    pub fn new(stamina: f64, effort: f64, recovery: f64, capacity: f64) -> Self {
        Self {
            stamina,
            effort,
            recovery,
            capacity,
        }
    }

    /// Stamina a dash of `power` costs (back dashes cost double).
    #[inline]
    pub fn dash_cost(power: f64) -> f64 {
        if power >= 0.0 {
            power
        } else {
            -2.0 * power
        }
    }

    /// Largest dash power the planner may spend this cycle.
    ///
    /// `requested` is clamped by the actuator range and by the stamina left
    /// above `recover_dec_thr_value + safety_reserve`.
    pub fn safety_dash_power(
        &self,
        requested: f64,
        sp: &ServerParams,
        cfg: &StaminaConfig,
    ) -> f64 {
        let requested = sp.normalize_dash_power(requested);
        let spendable = (self.stamina - cfg.recover_dec_thr_value() - cfg.safety_reserve).max(0.0);
        if requested >= 0.0 {
            requested.min(spendable)
        } else {
            requested.max(-spendable / 2.0)
        }
    }

    /// One cycle without dashing.
    pub fn simulate_wait(&mut self, ptype: &PlayerType, cfg: &StaminaConfig) {
        let max = cfg.stamina_max;

        if self.stamina <= cfg.recover_dec_thr * max && self.recovery > cfg.recover_min {
            self.recovery = (self.recovery - cfg.recover_dec).max(cfg.recover_min);
        }

        if self.stamina <= cfg.effort_dec_thr * max && self.effort > ptype.effort_min {
            self.effort = (self.effort - cfg.effort_dec).max(ptype.effort_min);
        }

        if self.stamina >= cfg.effort_inc_thr * max && self.effort < ptype.effort_max {
            self.effort = (self.effort + cfg.effort_inc).min(ptype.effort_max);
        }

        let inc = (ptype.stamina_inc_max * self.recovery)
            .min(max - self.stamina)
            .min(self.capacity)
            .max(0.0);
        self.stamina += inc;
        self.capacity -= inc;
    }

    pub fn simulate_waits(&mut self, ptype: &PlayerType, cfg: &StaminaConfig, n_wait: u32) {
        for _ in 0..n_wait {
            self.simulate_wait(ptype, cfg);
        }
    }

    /// One cycle with a dash of `power`.
    pub fn simulate_dash(&mut self, ptype: &PlayerType, cfg: &StaminaConfig, power: f64) {
        self.stamina = (self.stamina - Self::dash_cost(power)).max(0.0);
        self.simulate_wait(ptype, cfg);
    }
}
