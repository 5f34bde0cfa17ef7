//! Keep-style dribble
//!
//! Body direction never changes. For each relative dash direction two
//! families are tried, each extended one dash at a time until the first
//! infeasible length:
//! - dash-only: the ball keeps its current roll
//! - kick-first: one kick parks the ball in front of the final position

use super::feasibility::{evaluate_branch, DribbleContext, RejectStats};
use super::{dribble_candidate, CourseGenerator};
use crate::engine::action::Candidate;
use crate::engine::kinematics::CachePlan;
use crate::engine::types::polar;

#[derive(Debug, Clone, Copy, Default)]
pub struct KeepDribbleGenerator;

impl KeepDribbleGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CourseGenerator for KeepDribbleGenerator {
    fn name(&self) -> &'static str {
        "keepDribble"
    }

    fn search(&self, ctx: &DribbleContext<'_>, candidates: &mut Vec<Candidate>, stats: &mut RejectStats) {
        let cfg = &ctx.config.keep;
        let body = ctx.agent.body;
        let power = ctx.config.server.max_dash_power;
        let trap_dist = ctx.trap_distance();

        for rel in &cfg.relative_dash_dirs_deg {
            let dash_dir = body + *rel;

            // dash-only
            let cache = ctx.simulate_agent(CachePlan {
                n_kick: 0,
                target_body: body,
                n_turn: 0,
                dash_dir,
                n_dash: cfg.max_dash_only_steps,
                dash_power: power,
            });
            for n_dash in 1..=cfg.max_dash_only_steps {
                match evaluate_branch(ctx, &cache, n_dash, None, stats) {
                    Some(branch) => candidates.push(dribble_candidate(ctx, &cache, branch, self.name())),
                    None => break,
                }
            }

            // kick-first
            let cache = ctx.simulate_agent(CachePlan {
                n_kick: 1,
                target_body: body,
                n_turn: 0,
                dash_dir,
                n_dash: cfg.max_kick_dash,
                dash_power: power,
            });
            for n_dash in cfg.min_kick_dash..=cfg.max_kick_dash {
                let n_total = 1 + n_dash;
                let agent_end = match cache.at(n_total as usize) {
                    Some(step) => step,
                    None => break,
                };
                let trap = agent_end.pos + polar(trap_dist, dash_dir);
                let first_vel = ctx.first_vel_to(&trap, n_total);
                match evaluate_branch(ctx, &cache, n_dash, Some(first_vel), stats) {
                    Some(branch) => candidates.push(dribble_candidate(ctx, &cache, branch, self.name())),
                    None => break,
                }
            }
        }
    }
}
