//! Per-cycle validity checks of a held plan
//!
//! Run before every execution, in this order; the first failure wins.

use crate::engine::action::{ActionKind, CooperativeAction, SafetyLevel};
use crate::engine::config::PlannerConfig;
use crate::engine::kinematics::{ball_trajectory, first_vel_for_travel};
use crate::engine::safety::SafetyClassifier;
use crate::engine::types::{distance_to_segment, Pitch, Vec2};
use crate::engine::world::WorldState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a held plan was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// Execution skipped a cycle; the open-loop prediction no longer holds
    MissedCycle { expected: u64, actual: u64 },
    PlayerCollision,
    /// Ball bumped while no kick or turn is left to fix it
    BallCollision,
    OpponentHoldsBall { unum: u8 },
    /// A kick is still due but the ball left the kickable area
    BallNotKickable,
    InterceptPredicted { unum: u8, step: u32 },
    PathBlocked { unum: u8 },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::MissedCycle { expected, actual } => {
                write!(f, "missed cycle (expected {}, got {})", expected, actual)
            }
            AbortReason::PlayerCollision => write!(f, "collided with a player"),
            AbortReason::BallCollision => write!(f, "collided with the ball"),
            AbortReason::OpponentHoldsBall { unum } => write!(f, "opponent {} holds the ball", unum),
            AbortReason::BallNotKickable => write!(f, "ball not kickable"),
            AbortReason::InterceptPredicted { unum, step } => {
                write!(f, "opponent {} intercepts on step {}", unum, step)
            }
            AbortReason::PathBlocked { unum } => write!(f, "opponent {} blocks the path", unum),
        }
    }
}

/// Validate `action` against this cycle's snapshot.
///
/// `expected_cycle` is the cycle the next execution must happen on (the
/// adoption cycle for the first step, previous execution + 1 afterwards).
/// `executed` counts the commands already sent; the path envelope is only
/// checked once the snapshot differs from the one the plan was graded on.
pub fn check(
    action: &CooperativeAction,
    world: &WorldState,
    expected_cycle: u64,
    executed: u32,
    config: &PlannerConfig,
) -> Result<(), AbortReason> {
    let sp = &config.server;
    let pitch = Pitch::from_server(sp);

    if world.time.cycle != expected_cycle {
        return Err(AbortReason::MissedCycle {
            expected: expected_cycle,
            actual: world.time.cycle,
        });
    }

    if world.agent.collision.player {
        return Err(AbortReason::PlayerCollision);
    }
    if world.agent.collision.ball && action.steps.kick == 0 && action.steps.turn == 0 {
        return Err(AbortReason::BallCollision);
    }

    if let Some(opponent) = world.opponent_holding_ball(sp, &pitch) {
        return Err(AbortReason::OpponentHoldsBall { unum: opponent.unum });
    }

    if action.steps.kick > 0 && !world.agent_kickable(sp) {
        return Err(AbortReason::BallNotKickable);
    }

    if action.kind.carries_ball() {
        check_interception(action, world, config)?;
    }

    if config.commitment.check_path && executed > 0 && matches!(action.kind, ActionKind::Dribble { .. }) {
        check_path(action, world, config, &pitch)?;
    }

    Ok(())
}

/// Ball positions over the next `n` cycles if the plan keeps running.
fn predicted_ball(action: &CooperativeAction, world: &WorldState, config: &PlannerConfig, n: u32) -> Vec<Vec2> {
    let decay = config.server.ball_decay;
    let vel = if action.steps.kick > 0 {
        first_vel_for_travel(&(action.target_ball_pos - world.ball.pos), action.steps.total(), decay)
    } else {
        world.ball.vel
    };
    let mut path = ball_trajectory(&world.ball.pos, &vel, n, decay);
    path.remove(0);
    path
}

/// Re-classify the next 1..=lookahead cycles; any Failure aborts.
fn check_interception(
    action: &CooperativeAction,
    world: &WorldState,
    config: &PlannerConfig,
) -> Result<(), AbortReason> {
    let n = config.commitment.intercept_lookahead.min(action.steps.total()).max(1);
    let classifier = SafetyClassifier::new(world, config);
    for (i, pos) in predicted_ball(action, world, config, n).iter().enumerate() {
        let step = i as u32 + 1;
        let verdict = classifier.classify_detailed(pos, step);
        if verdict.level == SafetyLevel::Failure {
            let unum = verdict.decisive.map(|e| e.unum).unwrap_or(0);
            return Err(AbortReason::InterceptPredicted { unum, step });
        }
    }
    Ok(())
}

/// Remaining ball path against every opponent's reach envelope.
///
/// Opponents are projected one coasting cycle ahead, as the classifier does;
/// a tackler still frozen when the plan ends cannot block it.
fn check_path(
    action: &CooperativeAction,
    world: &WorldState,
    config: &PlannerConfig,
    pitch: &Pitch,
) -> Result<(), AbortReason> {
    let sp = &config.server;
    let from = world.ball.pos;
    let to = action.target_ball_pos;
    let remaining = action.steps.total();
    for opponent in world.opponents_from_agent(config.safety.opponent_cutoff_m) {
        if opponent.is_tackling() && opponent.tackle_cycles.min(sp.tackle_cycles) >= remaining {
            continue;
        }
        let pos = opponent.player_type.inertia_point(&opponent.pos, &opponent.vel, 1);
        let envelope = opponent.seizing_radius(&to, sp, pitch) + config.commitment.path_envelope_margin_m;
        if distance_to_segment(&pos, &from, &to) < envelope {
            return Err(AbortReason::PathBlocked { unum: opponent.unum });
        }
    }
    Ok(())
}
