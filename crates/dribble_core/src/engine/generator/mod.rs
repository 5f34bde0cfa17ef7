//! Candidate Plan Generators
//!
//! Three interchangeable dribble searches behind one trait:
//!
//! | Generator | Body | Search |
//! |-----------|------|--------|
//! | `KeepDribbleGenerator` | fixed | a few dash dirs, dash-only and kick-first, extended step by step |
//! | `ShortDribbleGenerator` | turns | ring of target dirs, kick + turns + 2..=4 dashes |
//! | `OmniDribbleGenerator` | fixed | dash-dir ring x trap-angle ring, 3..=5 dashes |
//!
//! Every generator simulates branches through [`feasibility::evaluate_branch`],
//! then prunes with `erase_redundant` and marks the `get_best` entry.
//! [`memo::Memoized`] wraps any of them with per-cycle memoization.

pub mod feasibility;
pub mod keep_dribble;
pub mod memo;
pub mod omni_dribble;
pub mod short_dribble;

pub use feasibility::{evaluate_branch, Branch, DribbleContext, RejectReason, RejectStats};
pub use keep_dribble::KeepDribbleGenerator;
pub use memo::Memoized;
pub use omni_dribble::OmniDribbleGenerator;
pub use short_dribble::ShortDribbleGenerator;

use crate::engine::action::{erase_redundant, get_best, Candidate, CooperativeAction, SafetyLevel};
use crate::engine::config::PlannerConfig;
use crate::engine::kinematics::AgentCache;
use crate::engine::types::{Vec2, VecExt};
use crate::engine::world::{GameTime, WorldState};
use serde::{Deserialize, Serialize};

/// Clearance recorded when no opponent is on the pitch
pub const MAX_CLEARANCE_M: f64 = 1000.0;

/// Pruned result of one generator call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOutput {
    /// Snapshot time the output was computed for
    pub time: GameTime,
    /// At most one candidate per safety level, Safe first
    pub candidates: Vec<Candidate>,
    /// Index of the preferred candidate
    pub best: Option<usize>,
    pub stats: RejectStats,
}

impl GeneratorOutput {
    pub fn empty(time: GameTime) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn best_candidate(&self) -> Option<&Candidate> {
        self.best.and_then(|i| self.candidates.get(i))
    }

    pub fn best_action(&self) -> Option<&CooperativeAction> {
        self.best_candidate().map(|c| &c.action)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A dribble search strategy.
pub trait CourseGenerator {
    /// Short tag used in descriptions and logs
    fn name(&self) -> &'static str;

    /// Append every surviving branch as a candidate.
    fn search(&self, ctx: &DribbleContext<'_>, candidates: &mut Vec<Candidate>, stats: &mut RejectStats);

    /// Search, prune and pick the best for `world`.
    ///
    /// Empty when the agent cannot dribble this cycle.
    fn generate(&self, world: &WorldState, config: &PlannerConfig) -> GeneratorOutput {
        let ctx = match DribbleContext::new(world, config) {
            Some(ctx) => ctx,
            None => {
                log::debug!("{} {}: ball not under control, no candidates", self.name(), world.time);
                return GeneratorOutput::empty(world.time);
            }
        };

        let mut candidates = Vec::new();
        let mut stats = RejectStats::default();
        self.search(&ctx, &mut candidates, &mut stats);
        let generated = candidates.len();

        erase_redundant(&mut candidates);
        let best = get_best(&candidates);

        log::debug!(
            "{} {}: {} generated, {} kept, {} rejected, best {:?}",
            self.name(),
            world.time,
            generated,
            candidates.len(),
            stats.total(),
            best.and_then(|i| candidates.get(i)).map(|c| c.action.to_string())
        );

        GeneratorOutput {
            time: world.time,
            candidates,
            best,
            stats,
        }
    }
}

/// Wrap a surviving branch into a dribble candidate.
pub(crate) fn dribble_candidate(
    ctx: &DribbleContext<'_>,
    cache: &AgentCache,
    branch: Branch,
    tag: &str,
) -> Candidate {
    let target_ball = branch.final_ball();
    let first_ball_vel = if branch.steps.kick > 0 {
        branch.first_ball_vel
    } else {
        Vec2::zeros()
    };
    let first_turn_moment = if branch.steps.turn > 0 {
        cache.first_turn_moment()
    } else {
        0.0
    };
    let description = format!("{}:{}", tag, branch.steps.composition());

    let action = CooperativeAction::dribble(
        ctx.world.agent.unum,
        target_ball,
        branch.final_agent.pos,
        branch.final_agent.body,
        first_ball_vel,
        first_turn_moment,
        cache.first_dash_power(),
        cache.first_dash_dir(),
        branch.steps,
    )
    .with_safety(branch.safety)
    .with_description(description);

    Candidate::new(
        action,
        ctx.world.nearest_opponent_dist(&target_ball).min(MAX_CLEARANCE_M),
        branch.final_agent.pos.dist(&ctx.agent.pos),
    )
}

/// Keep the better of two candidates for the same direction: safety, then dash count.
pub(crate) fn keep_safer(slot: &mut Option<Candidate>, candidate: Candidate) {
    let replace = match slot {
        None => true,
        Some(current) => {
            (candidate.safety(), candidate.dash_count()) > (current.safety(), current.dash_count())
        }
    };
    if replace {
        *slot = Some(candidate);
    }
}

/// Whether a level stops the inner search of a direction.
#[inline]
pub(crate) fn is_settled(level: SafetyLevel) -> bool {
    level == SafetyLevel::Safe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::StepCounts;
    use crate::engine::types::AngleDeg;

    fn cand(level: SafetyLevel, dashes: u32) -> Candidate {
        let action = CooperativeAction::dribble(
            1,
            Vec2::zeros(),
            Vec2::zeros(),
            AngleDeg::ZERO,
            Vec2::zeros(),
            0.0,
            100.0,
            AngleDeg::ZERO,
            StepCounts::new(1, 0, dashes),
        )
        .with_safety(level);
        Candidate::new(action, 5.0, 1.0)
    }

    #[test]
    fn test_keep_safer() {
        let mut slot = None;
        keep_safer(&mut slot, cand(SafetyLevel::Dangerous, 4));
        keep_safer(&mut slot, cand(SafetyLevel::Safe, 2));
        keep_safer(&mut slot, cand(SafetyLevel::MaybeDangerous, 5));
        keep_safer(&mut slot, cand(SafetyLevel::Safe, 3));
        let kept = slot.unwrap();
        assert_eq!(kept.safety(), SafetyLevel::Safe);
        assert_eq!(kept.dash_count(), 3);
    }

    #[test]
    fn test_empty_output() {
        let out = GeneratorOutput::empty(GameTime::at(3));
        assert!(out.is_empty());
        assert!(out.best_action().is_none());
        assert_eq!(out.time, GameTime::at(3));
    }
}
