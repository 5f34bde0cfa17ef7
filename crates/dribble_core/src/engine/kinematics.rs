//! Kinematic Stepper
//!
//! One-cycle forward models for the agent and the ball, plus the per-direction
//! caches the generators reuse across many step-count trials.
//!
//! # 핵심 원칙
//! - Every generator (and the commitment) advances state through the same
//!   `dash_step` / `turn_step` / `coast_step` / `ball_step` functions.
//! - Nothing here fails: a step that leaves the pitch is reported through
//!   `Option`/`bool` and the caller drops the branch.
//!
//! # 사용법
//! ```ignore
//! let mut stamina = world.agent.stamina;
//! let next = dash_step(&AgentStep::from_agent(&world.agent), &world.agent.player_type,
//!                      &mut stamina, &config.server, &config.stamina, 100.0, AngleDeg::ZERO);
//! ```

use crate::engine::config::{geometric_sum, ServerParams, StaminaConfig};
use crate::engine::player_type::PlayerType;
use crate::engine::stamina::StaminaModel;
use crate::engine::types::{polar, AngleDeg, Pitch, Vec2, VecExt};
use crate::engine::world::AgentState;

/// Safety cap on simulated turn cycles.
const MAX_TURN_ITERATIONS: u32 = 16;

// ============================================================
// Agent model
// ============================================================

/// Agent kinematic state between two commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentStep {
    pub pos: Vec2,
    pub vel: Vec2,
    pub body: AngleDeg,
}

impl AgentStep {
    pub fn from_agent(agent: &AgentState) -> Self {
        Self {
            pos: agent.pos,
            vel: agent.vel,
            body: agent.body,
        }
    }
}

/// Result of one dash: the new state and the command actually issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashOutcome {
    pub step: AgentStep,
    /// Power after the stamina/actuator clamp
    pub power: f64,
    /// Body-relative direction after grid snapping
    pub dir: AngleDeg,
}

/// Advance the agent one cycle with a dash.
///
/// The direction is snapped to the dash grid, the power is clamped by the
/// actuator range and the stamina safety output, speed is capped at
/// `player_speed_max`, then velocity decays.
pub fn dash_step(
    state: &AgentStep,
    ptype: &PlayerType,
    stamina: &mut StaminaModel,
    sp: &ServerParams,
    stamina_cfg: &StaminaConfig,
    power: f64,
    rel_dir: AngleDeg,
) -> DashOutcome {
    let dir = sp.discretize_dash_angle(rel_dir);
    let power = stamina.safety_dash_power(power, sp, stamina_cfg);

    let accel_mag = power.abs() * ptype.dash_power_rate * stamina.effort * sp.dash_dir_rate(dir);
    let accel_dir = if power >= 0.0 {
        state.body + dir
    } else {
        state.body + dir + 180.0
    };

    let mut vel = state.vel + polar(accel_mag, accel_dir);
    let speed = vel.norm();
    if speed > ptype.player_speed_max {
        vel *= ptype.player_speed_max / speed;
    }
    let pos = state.pos + vel;
    stamina.simulate_dash(ptype, stamina_cfg, power);

    DashOutcome {
        step: AgentStep {
            pos,
            vel: vel * ptype.player_decay,
            body: state.body,
        },
        power,
        dir,
    }
}

/// Advance the agent one cycle with a turn of `moment`.
pub fn turn_step(
    state: &AgentStep,
    ptype: &PlayerType,
    stamina: &mut StaminaModel,
    sp: &ServerParams,
    stamina_cfg: &StaminaConfig,
    moment: f64,
) -> AgentStep {
    let moment = sp.normalize_moment(moment);
    let speed = state.vel.norm();
    let body = state.body + ptype.effective_turn(moment, speed);
    stamina.simulate_wait(ptype, stamina_cfg);
    AgentStep {
        pos: state.pos + state.vel,
        vel: state.vel * ptype.player_decay,
        body,
    }
}

/// Advance the agent one cycle without moving itself (kick or wait).
pub fn coast_step(
    state: &AgentStep,
    ptype: &PlayerType,
    stamina: &mut StaminaModel,
    stamina_cfg: &StaminaConfig,
) -> AgentStep {
    stamina.simulate_wait(ptype, stamina_cfg);
    AgentStep {
        pos: state.pos + state.vel,
        vel: state.vel * ptype.player_decay,
        body: state.body,
    }
}

/// Moment that turns from `body` toward `target` as far as one cycle allows.
pub fn turn_moment_toward(
    body: AngleDeg,
    target: AngleDeg,
    speed: f64,
    ptype: &PlayerType,
    sp: &ServerParams,
) -> f64 {
    let angle = (target - body).degrees();
    sp.normalize_moment(ptype.moment_for_turn(angle, speed))
}

/// Turn cycles a player needs before its facing is within `tolerance` of `target`.
///
/// Returns the cycle count and the body direction reached. Speed decays
/// between turns, so later turns sweep further.
pub fn predict_turn_cycles(
    ptype: &PlayerType,
    sp: &ServerParams,
    body: AngleDeg,
    speed: f64,
    target: AngleDeg,
    tolerance: f64,
) -> (u32, AngleDeg) {
    let mut body = body;
    let mut speed = speed;
    let mut n_turn = 0;
    while body.diff(target) > tolerance && n_turn < MAX_TURN_ITERATIONS {
        let max_turn = ptype.effective_turn(sp.max_moment, speed);
        body = body.rotate_toward(target, max_turn);
        speed *= ptype.player_decay;
        n_turn += 1;
    }
    (n_turn, body)
}

// ============================================================
// Ball model
// ============================================================

/// Ball state between two cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallStep {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Advance the ball one cycle: move, then decay.
#[inline]
pub fn ball_step(ball: &BallStep, decay: f64) -> BallStep {
    BallStep {
        pos: ball.pos + ball.vel,
        vel: ball.vel * decay,
    }
}

/// Advance the ball one cycle, rejecting positions outside the playable area.
pub fn ball_step_in_field(
    ball: &BallStep,
    sp: &ServerParams,
    pitch: &Pitch,
    margin: f64,
) -> Option<BallStep> {
    let next = ball_step(ball, sp.ball_decay);
    pitch.contains(&next.pos, margin).then_some(next)
}

/// Closed-form ball position after `n_step` undisturbed cycles.
#[inline]
pub fn ball_future_pos(pos: &Vec2, vel: &Vec2, n_step: u32, decay: f64) -> Vec2 {
    pos + vel * geometric_sum(decay, n_step)
}

/// First velocity that carries the ball by `displacement` in exactly `n_step` cycles.
#[inline]
pub fn first_vel_for_travel(displacement: &Vec2, n_step: u32, decay: f64) -> Vec2 {
    let factor = geometric_sum(decay, n_step);
    if factor < 1e-9 {
        return Vec2::zeros();
    }
    displacement / factor
}

/// Ball positions for steps `0..=n_step` from a given velocity.
pub fn ball_trajectory(pos: &Vec2, vel: &Vec2, n_step: u32, decay: f64) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(n_step as usize + 1);
    let mut ball = BallStep { pos: *pos, vel: *vel };
    out.push(ball.pos);
    for _ in 0..n_step {
        ball = ball_step(&ball, decay);
        out.push(ball.pos);
    }
    out
}

// ============================================================
// Kick model
// ============================================================

/// Fraction of kick power that becomes ball acceleration.
///
/// Drops with the ball's angle off the body and with its distance beyond
/// the body surface.
pub fn kick_rate(
    agent_pos: &Vec2,
    body: AngleDeg,
    ball_pos: &Vec2,
    ptype: &PlayerType,
    sp: &ServerParams,
) -> f64 {
    let rel = ball_pos - agent_pos;
    let dir_diff = (rel.th() - body).abs();
    let margin = ptype.kickable_margin.max(1e-6);
    let dist_term = ((rel.norm() - ptype.player_size - sp.ball_size) / margin).clamp(0.0, 1.0);
    sp.kick_power_rate * (1.0 - 0.25 * dir_diff / 180.0 - 0.25 * dist_term)
}

/// Largest ball acceleration a single kick can produce.
#[inline]
pub fn max_kick_accel(kick_rate: f64, sp: &ServerParams) -> f64 {
    (sp.max_power * kick_rate).min(sp.ball_accel_max)
}

/// Why a requested first ball velocity cannot be produced by one kick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickLimit {
    BallSpeed,
    AccelMax,
    KickPower,
}

/// Check a requested first ball velocity against the kick limits.
///
/// Returns the needed kick power on success. Nothing is clamped: a kick
/// beyond the limits is infeasible.
pub fn check_kick(
    first_vel: &Vec2,
    ball_vel: &Vec2,
    kick_rate: f64,
    sp: &ServerParams,
) -> Result<f64, KickLimit> {
    if first_vel.norm() > sp.ball_speed_max + 1e-9 {
        return Err(KickLimit::BallSpeed);
    }
    let accel = (first_vel - ball_vel).norm();
    if accel > sp.ball_accel_max + 1e-9 {
        return Err(KickLimit::AccelMax);
    }
    let power = accel / kick_rate.max(1e-9);
    if power > sp.max_power + 1e-9 {
        return Err(KickLimit::KickPower);
    }
    Ok(power)
}

/// Kick command (power, body-relative direction) producing `first_vel`.
///
/// Unlike [`check_kick`] this clamps the power to `max_power`. The flag is
/// set when clamping happened.
pub fn kick_command_for(
    first_vel: &Vec2,
    ball_vel: &Vec2,
    kick_rate: f64,
    body: AngleDeg,
    sp: &ServerParams,
) -> (f64, AngleDeg, bool) {
    let accel = first_vel - ball_vel;
    let raw_power = accel.norm() / kick_rate.max(1e-9);
    let power = raw_power.min(sp.max_power);
    (power, accel.th() - body, raw_power > sp.max_power + 1e-9)
}

// ============================================================
// Kinematic cache
// ============================================================

/// Command layout used to build an [`AgentCache`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePlan {
    pub n_kick: u32,
    /// Body direction the turns aim for
    pub target_body: AngleDeg,
    pub n_turn: u32,
    /// Absolute dash direction
    pub dash_dir: AngleDeg,
    pub n_dash: u32,
    /// Requested power of every dash (clamped by stamina per step)
    pub dash_power: f64,
}

/// Predicted agent states, indexed by plan step (`0` = now).
#[derive(Debug, Clone)]
pub struct AgentCache {
    steps: Vec<AgentStep>,
    plan: CachePlan,
    first_turn_moment: f64,
    first_dash_power: f64,
    first_dash_dir: AngleDeg,
}

impl AgentCache {
    /// Simulate kicks (coasting), turns toward `target_body`, then dashes.
    pub fn build(
        start: &AgentStep,
        stamina: &StaminaModel,
        ptype: &PlayerType,
        sp: &ServerParams,
        stamina_cfg: &StaminaConfig,
        plan: CachePlan,
    ) -> Self {
        let total = (plan.n_kick + plan.n_turn + plan.n_dash) as usize;
        let mut steps = Vec::with_capacity(total + 1);
        let mut stamina = *stamina;
        let mut state = *start;
        steps.push(state);

        for _ in 0..plan.n_kick {
            state = coast_step(&state, ptype, &mut stamina, stamina_cfg);
            steps.push(state);
        }

        let mut first_turn_moment = 0.0;
        for i in 0..plan.n_turn {
            let moment = turn_moment_toward(state.body, plan.target_body, state.vel.norm(), ptype, sp);
            if i == 0 {
                first_turn_moment = moment;
            }
            state = turn_step(&state, ptype, &mut stamina, sp, stamina_cfg, moment);
            steps.push(state);
        }

        let mut first_dash_power = 0.0;
        let mut first_dash_dir = AngleDeg::ZERO;
        for i in 0..plan.n_dash {
            let rel_dir = plan.dash_dir - state.body;
            let outcome = dash_step(&state, ptype, &mut stamina, sp, stamina_cfg, plan.dash_power, rel_dir);
            if i == 0 {
                first_dash_power = outcome.power;
                first_dash_dir = outcome.dir;
            }
            state = outcome.step;
            steps.push(state);
        }

        Self {
            steps,
            plan,
            first_turn_moment,
            first_dash_power,
            first_dash_dir,
        }
    }

    /// State after `step` commands.
    #[inline]
    pub fn at(&self, step: usize) -> Option<&AgentStep> {
        self.steps.get(step)
    }

    #[inline]
    pub fn first(&self) -> &AgentStep {
        &self.steps[0]
    }

    #[inline]
    pub fn last(&self) -> &AgentStep {
        // never empty: the start state is always pushed
        &self.steps[self.steps.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn plan(&self) -> &CachePlan {
        &self.plan
    }

    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    pub fn first_turn_moment(&self) -> f64 {
        self.first_turn_moment
    }

    pub fn first_dash_power(&self) -> f64 {
        self.first_dash_power
    }

    /// Body-relative, grid-snapped direction of the first dash.
    pub fn first_dash_dir(&self) -> AngleDeg {
        self.first_dash_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (PlayerType, ServerParams, StaminaConfig) {
        (PlayerType::default(), ServerParams::default(), StaminaConfig::default())
    }

    #[test]
    fn test_dash_step_from_rest() {
        let (pt, sp, sc) = fixture();
        let mut stamina = StaminaModel::default();
        let start = AgentStep {
            pos: Vec2::zeros(),
            vel: Vec2::zeros(),
            body: AngleDeg::ZERO,
        };
        let out = dash_step(&start, &pt, &mut stamina, &sp, &sc, 100.0, AngleDeg::ZERO);
        assert!((out.step.pos.x - 0.6).abs() < 1e-9);
        assert!((out.step.vel.x - 0.24).abs() < 1e-9);
        assert!((out.power - 100.0).abs() < 1e-9);
        assert!(stamina.stamina < 8000.0);
    }

    #[test]
    fn test_dash_step_snaps_direction_and_reduces_side_rate() {
        let (pt, sp, sc) = fixture();
        let mut stamina = StaminaModel::default();
        let start = AgentStep {
            pos: Vec2::zeros(),
            vel: Vec2::zeros(),
            body: AngleDeg::ZERO,
        };
        let out = dash_step(&start, &pt, &mut stamina, &sp, &sc, 100.0, AngleDeg::new(80.0));
        assert!((out.dir.degrees() - 90.0).abs() < 1e-9);
        // side dash: 0.6 * 0.4
        assert!((out.step.pos.y - 0.24).abs() < 1e-9);
        assert!(out.step.pos.x.abs() < 1e-9);
    }

    #[test]
    fn test_dash_speed_is_capped() {
        let (_, sp, sc) = fixture();
        let pt = PlayerType {
            dash_power_rate: 0.02,
            ..PlayerType::default()
        };
        let mut stamina = StaminaModel::default();
        let start = AgentStep {
            pos: Vec2::zeros(),
            vel: Vec2::new(0.5, 0.0),
            body: AngleDeg::ZERO,
        };
        let out = dash_step(&start, &pt, &mut stamina, &sp, &sc, 100.0, AngleDeg::ZERO);
        assert!((out.step.pos.x - pt.player_speed_max).abs() < 1e-9);
    }

    #[test]
    fn test_turn_step_limited_by_speed() {
        let (pt, sp, sc) = fixture();
        let mut stamina = StaminaModel::default();
        let start = AgentStep {
            pos: Vec2::zeros(),
            vel: Vec2::new(0.2, 0.0),
            body: AngleDeg::ZERO,
        };
        let next = turn_step(&start, &pt, &mut stamina, &sp, &sc, 180.0);
        assert!((next.body.degrees() - 90.0).abs() < 1e-9);
        assert!((next.pos.x - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_predict_turn_cycles() {
        let (pt, sp, _) = fixture();
        let (n, body) = predict_turn_cycles(&pt, &sp, AngleDeg::ZERO, 0.0, AngleDeg::new(5.0), 10.0);
        assert_eq!(n, 0);
        assert_eq!(body, AngleDeg::ZERO);

        let (n, body) = predict_turn_cycles(&pt, &sp, AngleDeg::ZERO, 0.0, AngleDeg::new(120.0), 10.0);
        assert_eq!(n, 1);
        assert!((body.degrees() - 120.0).abs() < 1e-9);

        // fast player needs two turns for a half turn
        let (n, _) = predict_turn_cycles(&pt, &sp, AngleDeg::ZERO, 0.4, AngleDeg::new(165.0), 10.0);
        assert_eq!(n, 2);
    }

    #[test]
    fn test_ball_steps_match_geometric_extrapolation() {
        let sp = ServerParams::default();
        let mut ball = BallStep {
            pos: Vec2::new(1.0, -2.0),
            vel: Vec2::new(1.5, 0.7),
        };
        let start = ball;
        for _ in 0..12 {
            ball = ball_step(&ball, sp.ball_decay);
        }
        let closed = ball_future_pos(&start.pos, &start.vel, 12, sp.ball_decay);
        assert!((ball.pos - closed).norm() < 1e-9);
    }

    #[test]
    fn test_ball_step_in_field_rejects_out() {
        let sp = ServerParams::default();
        let pitch = Pitch::default();
        let ball = BallStep {
            pos: Vec2::new(51.0, 0.0),
            vel: Vec2::new(1.0, 0.0),
        };
        assert!(ball_step_in_field(&ball, &sp, &pitch, 0.0).is_some());
        assert!(ball_step_in_field(&ball, &sp, &pitch, 1.0).is_none());
    }

    #[test]
    fn test_first_vel_inverts_extrapolation() {
        let decay = 0.94;
        let disp = Vec2::new(3.0, 1.0);
        let vel = first_vel_for_travel(&disp, 4, decay);
        let end = ball_future_pos(&Vec2::zeros(), &vel, 4, decay);
        assert!((end - disp).norm() < 1e-9);
        assert_eq!(first_vel_for_travel(&disp, 0, decay), Vec2::zeros());
    }

    #[test]
    fn test_kick_rate_best_in_front_close() {
        let (pt, sp, _) = fixture();
        let me = Vec2::zeros();
        let close_front = kick_rate(&me, AngleDeg::ZERO, &Vec2::new(0.385, 0.0), &pt, &sp);
        let far_back = kick_rate(&me, AngleDeg::ZERO, &Vec2::new(-1.0, 0.0), &pt, &sp);
        assert!((close_front - sp.kick_power_rate).abs() < 1e-9);
        assert!(far_back < close_front);
        assert!((max_kick_accel(close_front, &sp) - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_check_kick_limits() {
        let sp = ServerParams::default();
        let rate = 0.027;
        assert!(check_kick(&Vec2::new(1.0, 0.0), &Vec2::zeros(), rate, &sp).is_ok());
        assert_eq!(
            check_kick(&Vec2::new(3.5, 0.0), &Vec2::zeros(), rate, &sp),
            Err(KickLimit::BallSpeed)
        );
        assert_eq!(
            check_kick(&Vec2::new(2.9, 0.0), &Vec2::zeros(), rate, &sp),
            Err(KickLimit::AccelMax)
        );
        // weak kick rate: 2.0 accel needs 200 power
        assert_eq!(
            check_kick(&Vec2::new(2.0, 0.0), &Vec2::zeros(), 0.01, &sp),
            Err(KickLimit::KickPower)
        );
    }

    #[test]
    fn test_kick_command_clamps_and_flags() {
        let sp = ServerParams::default();
        let (power, dir, clamped) =
            kick_command_for(&Vec2::new(0.0, 2.0), &Vec2::zeros(), 0.01, AngleDeg::ZERO, &sp);
        assert!((power - 100.0).abs() < 1e-9);
        assert!((dir.degrees() - 90.0).abs() < 1e-9);
        assert!(clamped);
    }

    #[test]
    fn test_agent_cache_layout() {
        let (pt, sp, sc) = fixture();
        let start = AgentStep {
            pos: Vec2::zeros(),
            vel: Vec2::new(0.1, 0.0),
            body: AngleDeg::ZERO,
        };
        let plan = CachePlan {
            n_kick: 1,
            target_body: AngleDeg::new(90.0),
            n_turn: 1,
            dash_dir: AngleDeg::new(90.0),
            n_dash: 3,
            dash_power: 100.0,
        };
        let cache = AgentCache::build(&start, &StaminaModel::default(), &pt, &sp, &sc, plan);
        assert_eq!(cache.len(), 6);
        assert!((cache.last().body.degrees() - 90.0).abs() < 1e-6);
        assert!(cache.last().pos.y > 1.5);
        assert!((cache.first_dash_power() - 100.0).abs() < 1e-9);
        assert!(cache.first_dash_dir().abs() < 1e-9);
        assert!(cache.first_turn_moment() > 90.0);
    }
}
