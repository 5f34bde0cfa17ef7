//! # Planner Configuration Module
//!
//! 모든 튜닝 상수를 중앙에서 관리하는 설정 시스템.
//!
//! Every threshold the planner consults is a field of [`PlannerConfig`]:
//! server physics, stamina model, safety tiers, branch feasibility, the
//! three generator search ranges and the commitment re-validation.
//!
//! ## 사용법
//! ```rust
//! use dribble_core::engine::config::PlannerConfig;
//!
//! let config = PlannerConfig::default();
//! let cautious = PlannerConfig::cautious();
//! assert!(cautious.safety.maybe_dangerous_margin > config.safety.maybe_dangerous_margin);
//! ```
//!
//! ## Environment Variables
//!
//! - `DRIBBLE_PROFILE`: Select preset (aggressive, cautious, deterministic, default)

mod commitment_config;
mod generator_config;
mod server_config;
mod stamina_config;
mod thresholds_config;

pub use commitment_config::CommitmentConfig;
pub use generator_config::{KeepDribbleConfig, OmniDribbleConfig, ShortDribbleConfig};
pub use server_config::{geometric_sum, ServerParams};
pub use stamina_config::StaminaConfig;
pub use thresholds_config::{ConfidenceDiscount, FeasibilityThresholds, SafetyThresholds};

use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use validator::Validate;

/// Environment variable selecting a preset in [`PlannerConfig::from_env_or_default`]
pub const PROFILE_ENV: &str = "DRIBBLE_PROFILE";

/// 전체 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema, Validate)]
#[serde(default)]
pub struct PlannerConfig {
    /// Server physics
    #[validate]
    pub server: ServerParams,
    /// Stamina model
    #[validate]
    pub stamina: StaminaConfig,
    /// Safety classifier
    #[validate]
    pub safety: SafetyThresholds,
    /// Branch rejection
    #[validate]
    pub feasibility: FeasibilityThresholds,
    /// Short dribble search
    #[validate]
    pub short: ShortDribbleConfig,
    /// Keep dribble search
    #[validate]
    pub keep: KeepDribbleConfig,
    /// Omnidirectional dribble search
    #[validate]
    pub omni: OmniDribbleConfig,
    /// Plan execution
    #[validate]
    pub commitment: CommitmentConfig,
}

impl PlannerConfig {
    /// Stock server values (기본)
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Thinner safety margins, longer plans
    pub fn aggressive() -> Self {
        let mut cfg = Self::default();
        cfg.safety.dangerous_margin = 2;
        cfg.safety.maybe_dangerous_margin = 4;
        cfg.safety.discount.near_goal_cap = 0;
        cfg.short.max_dash = 5;
        cfg.keep.max_kick_dash = 10;
        cfg.omni.max_dash = 6;
        cfg
    }

    /// Wider safety margins, shorter plans
    pub fn cautious() -> Self {
        let mut cfg = Self::default();
        cfg.safety.opponent_cutoff_m = 25.0;
        cfg.safety.dangerous_margin = 4;
        cfg.safety.maybe_dangerous_margin = 7;
        cfg.safety.reach_slack_m = 0.2;
        cfg.short.max_dash = 3;
        cfg.keep.max_kick_dash = 6;
        cfg.commitment.path_envelope_margin_m = 0.6;
        cfg
    }

    /// 테스트용: no discount for unseen opponents
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.safety.discount.per_unseen_cycle = 0.0;
        cfg
    }

    /// Load from environment variable `DRIBBLE_PROFILE` or use default
    pub fn from_env_or_default() -> Self {
        Self::from_profile_name(&env::var(PROFILE_ENV).unwrap_or_default())
    }

    /// Preset by name; unknown names fall back to default
    pub fn from_profile_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "aggressive" => Self::aggressive(),
            "cautious" => Self::cautious(),
            "deterministic" => Self::deterministic(),
            _ => Self::default(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let cfg = match ext.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            _ => {
                return Err(ConfigError::UnknownFormat {
                    path: path.display().to_string(),
                })
            }
        };
        log::debug!("Loaded planner config from {}", path.display());
        Ok(cfg)
    }

    /// JSON schema of the whole configuration tree
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PlannerConfig)
    }
}

// ========== Tests ==========
