//! Branch simulation and feasibility checks shared by every generator
//!
//! A branch is one concrete (kick?, turns, dashes) layout. It is simulated
//! through the kinematic stepper and rejected on the first violated check:
//! - kick limits (ball speed, accel, kick power)
//! - ball or agent leaving the field
//! - agent-ball collision
//! - Failure on any step
//! - ball out of control after the last command

use crate::engine::action::{SafetyLevel, StepCounts};
use crate::engine::config::PlannerConfig;
use crate::engine::kinematics::{
    ball_step_in_field, check_kick, first_vel_for_travel, kick_rate, AgentCache, AgentStep, BallStep,
    CachePlan, KickLimit,
};
use crate::engine::safety::SafetyClassifier;
use crate::engine::types::{Pitch, Vec2, VecExt};
use crate::engine::world::WorldState;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Why a branch was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
pub enum RejectReason {
    BallSpeed,
    KickAccel,
    KickPower,
    BallOutOfField,
    AgentOutOfField,
    Collision,
    Intercepted,
    LostControl,
    TooManyTurns,
}

/// Rejected-branch counters of one generator call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectStats {
    pub ball_speed: u32,
    pub kick_accel: u32,
    pub kick_power: u32,
    pub ball_out_of_field: u32,
    pub agent_out_of_field: u32,
    pub collision: u32,
    pub intercepted: u32,
    pub lost_control: u32,
    pub too_many_turns: u32,
}

impl RejectStats {
    pub fn record(&mut self, reason: RejectReason) {
        let slot = match reason {
            RejectReason::BallSpeed => &mut self.ball_speed,
            RejectReason::KickAccel => &mut self.kick_accel,
            RejectReason::KickPower => &mut self.kick_power,
            RejectReason::BallOutOfField => &mut self.ball_out_of_field,
            RejectReason::AgentOutOfField => &mut self.agent_out_of_field,
            RejectReason::Collision => &mut self.collision,
            RejectReason::Intercepted => &mut self.intercepted,
            RejectReason::LostControl => &mut self.lost_control,
            RejectReason::TooManyTurns => &mut self.too_many_turns,
        };
        *slot += 1;
    }

    pub fn count(&self, reason: RejectReason) -> u32 {
        match reason {
            RejectReason::BallSpeed => self.ball_speed,
            RejectReason::KickAccel => self.kick_accel,
            RejectReason::KickPower => self.kick_power,
            RejectReason::BallOutOfField => self.ball_out_of_field,
            RejectReason::AgentOutOfField => self.agent_out_of_field,
            RejectReason::Collision => self.collision,
            RejectReason::Intercepted => self.intercepted,
            RejectReason::LostControl => self.lost_control,
            RejectReason::TooManyTurns => self.too_many_turns,
        }
    }

    pub fn total(&self) -> u32 {
        self.ball_speed
            + self.kick_accel
            + self.kick_power
            + self.ball_out_of_field
            + self.agent_out_of_field
            + self.collision
            + self.intercepted
            + self.lost_control
            + self.too_many_turns
    }
}

impl From<KickLimit> for RejectReason {
    fn from(limit: KickLimit) -> Self {
        match limit {
            KickLimit::BallSpeed => RejectReason::BallSpeed,
            KickLimit::AccelMax => RejectReason::KickAccel,
            KickLimit::KickPower => RejectReason::KickPower,
        }
    }
}

/// ============================================================================
/// DribbleContext
/// ============================================================================

/// Per-call view of the snapshot every generator works from.
pub struct DribbleContext<'a> {
    pub world: &'a WorldState,
    pub config: &'a PlannerConfig,
    pub pitch: Pitch,
    pub classifier: SafetyClassifier<'a>,
    pub agent: AgentStep,
    pub ball: BallStep,
    /// Kick rate for the ball where it is now
    pub kick_rate: f64,
}

impl<'a> DribbleContext<'a> {
    /// `None` when the agent cannot dribble this cycle (ball not kickable or
    /// agent frozen by its own tackle).
    pub fn new(world: &'a WorldState, config: &'a PlannerConfig) -> Option<Self> {
        let sp = &config.server;
        if world.agent.is_frozen() || !world.agent_kickable(sp) {
            return None;
        }
        let agent = AgentStep::from_agent(&world.agent);
        Some(Self {
            world,
            config,
            pitch: Pitch::from_server(sp),
            classifier: SafetyClassifier::new(world, config),
            agent,
            ball: BallStep {
                pos: world.ball.pos,
                vel: world.ball.vel,
            },
            kick_rate: kick_rate(&agent.pos, agent.body, &world.ball.pos, &world.agent.player_type, sp),
        })
    }

    /// Distance from the agent at which a dribble parks the ball.
    pub fn trap_distance(&self) -> f64 {
        let pt = &self.world.agent.player_type;
        pt.player_size + self.config.server.ball_size + pt.kickable_margin * self.config.feasibility.trap_margin_ratio
    }

    /// Closer than this, agent and ball collide.
    pub fn collision_distance(&self) -> f64 {
        self.world.agent.player_type.player_size + self.config.server.ball_size + self.config.feasibility.collision_buffer_m
    }

    /// Largest agent-ball distance still counted as under control after `n_dash` dashes.
    pub fn control_radius(&self, ball_in_front: bool, n_dash: u32) -> f64 {
        let f = &self.config.feasibility;
        let buffer = if ball_in_front {
            f.control_front_buffer_m
        } else {
            f.control_back_buffer_m
        };
        self.world.agent.player_type.kickable_area(&self.config.server)
            - buffer
            - f.control_tighten_per_dash_m * n_dash as f64
    }

    /// First ball velocity that parks the ball at `trap` after `n_total` cycles.
    pub fn first_vel_to(&self, trap: &Vec2, n_total: u32) -> Vec2 {
        first_vel_for_travel(&(trap - self.ball.pos), n_total, self.config.server.ball_decay)
    }

    /// Agent states of `plan` from the current snapshot.
    pub fn simulate_agent(&self, plan: CachePlan) -> AgentCache {
        AgentCache::build(
            &self.agent,
            &self.world.agent.stamina,
            &self.world.agent.player_type,
            &self.config.server,
            &self.config.stamina,
            plan,
        )
    }
}

/// ============================================================================
/// Branch evaluation
/// ============================================================================

/// A branch that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub steps: StepCounts,
    /// Agent state after the last command
    pub final_agent: AgentStep,
    /// Ball position on steps `1..=n_total`
    pub ball_path: Vec<Vec2>,
    /// Ball velocity right after the kick (current velocity when no kick)
    pub first_ball_vel: Vec2,
    /// Worst level over the path
    pub safety: SafetyLevel,
}

impl Branch {
    pub fn final_ball(&self) -> Vec2 {
        self.ball_path.last().copied().unwrap_or_else(Vec2::zeros)
    }
}

/// Check the first `n_dash` dashes of `cache` against the ball path.
///
/// The cache is built once per direction with the longest dash count and
/// every shorter trial reads a prefix of it. `first_ball_vel` is the
/// post-kick velocity, or `None` when the ball keeps rolling with its
/// current velocity (no kick in the plan).
pub fn evaluate_branch(
    ctx: &DribbleContext<'_>,
    cache: &AgentCache,
    n_dash: u32,
    first_ball_vel: Option<Vec2>,
    stats: &mut RejectStats,
) -> Option<Branch> {
    let sp = &ctx.config.server;
    let feas = &ctx.config.feasibility;
    let plan = cache.plan();
    let steps = StepCounts::new(plan.n_kick, plan.n_turn, n_dash.min(plan.n_dash));

    let ball_vel = match first_ball_vel {
        Some(vel) => {
            if let Err(limit) = check_kick(&vel, &ctx.ball.vel, ctx.kick_rate, sp) {
                return reject(stats, limit.into(), plan, &steps);
            }
            vel
        }
        None => ctx.ball.vel,
    };

    let n_total = steps.total();
    let collide = ctx.collision_distance();

    let mut ball = BallStep {
        pos: ctx.ball.pos,
        vel: ball_vel,
    };
    let mut ball_path = Vec::with_capacity(n_total as usize);
    let mut safety = SafetyLevel::Safe;
    let mut agent = *cache.first();

    for step in 1..=n_total {
        ball = match ball_step_in_field(&ball, sp, &ctx.pitch, feas.field_margin_m) {
            Some(next) => next,
            None => return reject(stats, RejectReason::BallOutOfField, plan, &steps),
        };
        agent = match cache.at(step as usize) {
            Some(next) => *next,
            None => return reject(stats, RejectReason::AgentOutOfField, plan, &steps),
        };
        if !ctx.pitch.contains(&agent.pos, 0.0) {
            return reject(stats, RejectReason::AgentOutOfField, plan, &steps);
        }
        if agent.pos.dist(&ball.pos) < collide {
            return reject(stats, RejectReason::Collision, plan, &steps);
        }
        safety = safety.worst(ctx.classifier.classify(&ball.pos, step));
        if safety == SafetyLevel::Failure {
            return reject(stats, RejectReason::Intercepted, plan, &steps);
        }
        ball_path.push(ball.pos);
    }

    let rel = (ball.pos - agent.pos).rotated(-agent.body);
    if rel.norm() > ctx.control_radius(rel.x >= 0.0, steps.dash) {
        return reject(stats, RejectReason::LostControl, plan, &steps);
    }

    Some(Branch {
        steps,
        final_agent: agent,
        ball_path,
        first_ball_vel: ball_vel,
        safety,
    })
}

fn reject(stats: &mut RejectStats, reason: RejectReason, plan: &CachePlan, steps: &StepCounts) -> Option<Branch> {
    log::trace!(
        "reject {} (kick {} turn {} dash {} dir {})",
        reason,
        steps.kick,
        steps.turn,
        steps.dash,
        plan.dash_dir
    );
    stats.record(reason);
    None
}
