//! YAML scenario fixtures
//!
//! A scenario is one world snapshot written in meters and degrees, plus an
//! optional config preset name. Used by tests and the bench.
//!
//! ```yaml
//! id: open_midfield
//! cycle: 120
//! profile: deterministic
//! agent: { unum: 9, pos_m: [0.0, 0.0], body_deg: 0.0 }
//! ball: { pos_m: [0.5, 0.0] }
//! opponents:
//!   - { unum: 4, pos_m: [8.0, 0.0], body_deg: 180.0 }
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::engine::config::PlannerConfig;
use crate::engine::player_type::PlayerType;
use crate::engine::stamina::StaminaModel;
use crate::engine::types::{AngleDeg, Vec2};
use crate::engine::world::{AgentState, BallState, CollisionFlags, GameTime, OpponentState, WorldState};
use crate::error::ScenarioError;

/// Positions further than this outside the pitch lines are rejected (meters)
const OUTSIDE_PITCH_LIMIT_M: f64 = 10.0;

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioAgent {
    pub unum: u8,
    pub pos_m: [f64; 2],
    #[serde(default)]
    pub vel: Option<[f64; 2]>,
    #[serde(default)]
    pub body_deg: f64,
    #[serde(default)]
    pub stamina: Option<f64>,
    #[serde(default)]
    pub effort: Option<f64>,
    #[serde(default)]
    pub player_type: Option<PlayerType>,
    #[serde(default)]
    pub collided_ball: bool,
    #[serde(default)]
    pub collided_player: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioBall {
    pub pos_m: [f64; 2],
    #[serde(default)]
    pub vel: Option<[f64; 2]>,
    #[serde(default)]
    pub pos_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioOpponent {
    pub unum: u8,
    pub pos_m: [f64; 2],
    #[serde(default)]
    pub vel: Option<[f64; 2]>,
    #[serde(default)]
    pub body_deg: f64,
    #[serde(default)]
    pub pos_count: u32,
    #[serde(default)]
    pub body_count: u32,
    #[serde(default)]
    pub tackle_cycles: u32,
    #[serde(default)]
    pub goalie: bool,
    #[serde(default)]
    pub player_type: Option<PlayerType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSpec {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cycle: u64,
    #[serde(default)]
    pub stopped: u32,
    /// Config preset name (see `PlannerConfig::from_profile_name`)
    #[serde(default)]
    pub profile: Option<String>,
    pub agent: ScenarioAgent,
    pub ball: ScenarioBall,
    #[serde(default)]
    pub opponents: Vec<ScenarioOpponent>,
}

impl ScenarioSpec {
    pub fn from_yaml_str(s: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let spec = Self::from_yaml_str(&raw)?;
        log::debug!("Loaded scenario {} from {}", spec.id, path.display());
        Ok(spec)
    }

    /// Config preset named by the scenario (default when absent).
    pub fn config(&self) -> PlannerConfig {
        self.profile
            .as_deref()
            .map(PlannerConfig::from_profile_name)
            .unwrap_or_default()
    }

    /// Validated world snapshot.
    pub fn to_world(&self, config: &PlannerConfig) -> Result<WorldState, ScenarioError> {
        let sp = &config.server;
        let limits = (
            sp.pitch_half_length + OUTSIDE_PITCH_LIMIT_M,
            sp.pitch_half_width + OUTSIDE_PITCH_LIMIT_M,
        );

        let a = &self.agent;
        check_unum(a.unum, "agent")?;
        let mut agent = AgentState::new(
            a.unum,
            position_checked(a.pos_m, "agent", limits)?,
            velocity_checked(a.vel, "agent")?,
            angle_checked(a.body_deg, "agent")?,
        );
        if let Some(ptype) = &a.player_type {
            agent.player_type = ptype.clone();
        }
        agent.stamina = StaminaModel {
            stamina: a.stamina.unwrap_or(config.stamina.stamina_max),
            effort: a.effort.unwrap_or(agent.player_type.effort_max),
            ..StaminaModel::default()
        };
        if !agent.stamina.stamina.is_finite() || agent.stamina.stamina < 0.0 {
            return Err(ScenarioError::Invalid(format!("agent stamina {} out of range", agent.stamina.stamina)));
        }
        agent.collision = CollisionFlags {
            ball: a.collided_ball,
            player: a.collided_player,
        };

        let mut ball = BallState::new(
            position_checked(self.ball.pos_m, "ball", limits)?,
            velocity_checked(self.ball.vel, "ball")?,
        );
        ball.pos_count = self.ball.pos_count;

        let mut world = WorldState::new(GameTime::new(self.cycle, self.stopped), agent, ball);
        let mut seen = HashSet::new();
        for o in &self.opponents {
            let label = format!("opponent {}", o.unum);
            check_unum(o.unum, &label)?;
            if !seen.insert(o.unum) {
                return Err(ScenarioError::Invalid(format!("duplicate {}", label)));
            }
            let mut opponent = OpponentState::new(
                o.unum,
                position_checked(o.pos_m, &label, limits)?,
                angle_checked(o.body_deg, &label)?,
            );
            opponent.vel = velocity_checked(o.vel, &label)?;
            opponent.pos_count = o.pos_count;
            opponent.body_count = o.body_count;
            opponent.tackle_cycles = o.tackle_cycles;
            opponent.is_goalie = o.goalie;
            if let Some(ptype) = &o.player_type {
                opponent.player_type = ptype.clone();
            }
            world.opponents.push(opponent);
        }
        Ok(world)
    }
}

/// Parse and build in one go, using the scenario's own preset.
pub fn from_yaml_str(s: &str) -> Result<(WorldState, PlannerConfig), ScenarioError> {
    let spec = ScenarioSpec::from_yaml_str(s)?;
    let config = spec.config();
    Ok((spec.to_world(&config)?, config))
}

pub fn load(path: impl AsRef<Path>) -> Result<(WorldState, PlannerConfig), ScenarioError> {
    let spec = ScenarioSpec::load_from_path(path)?;
    let config = spec.config();
    Ok((spec.to_world(&config)?, config))
}

fn check_unum(unum: u8, label: &str) -> Result<(), ScenarioError> {
    if (1..=11).contains(&unum) {
        Ok(())
    } else {
        Err(ScenarioError::Invalid(format!("{} has uniform number {} outside 1..=11", label, unum)))
    }
}

fn position_checked(pos_m: [f64; 2], label: &str, (max_x, max_y): (f64, f64)) -> Result<Vec2, ScenarioError> {
    let [x, y] = pos_m;
    if !x.is_finite() || !y.is_finite() {
        return Err(ScenarioError::Invalid(format!("{} position is not finite", label)));
    }
    if x.abs() > max_x || y.abs() > max_y {
        return Err(ScenarioError::Invalid(format!(
            "{} position ({:.1}, {:.1}) is off the pitch",
            label, x, y
        )));
    }
    Ok(Vec2::new(x, y))
}

fn velocity_checked(vel: Option<[f64; 2]>, label: &str) -> Result<Vec2, ScenarioError> {
    match vel {
        None => Ok(Vec2::zeros()),
        Some([x, y]) if x.is_finite() && y.is_finite() => Ok(Vec2::new(x, y)),
        Some(_) => Err(ScenarioError::Invalid(format!("{} velocity is not finite", label))),
    }
}

fn angle_checked(deg: f64, label: &str) -> Result<AngleDeg, ScenarioError> {
    if deg.is_finite() {
        Ok(AngleDeg::new(deg))
    } else {
        Err(ScenarioError::Invalid(format!("{} body angle is not finite", label)))
    }
}
