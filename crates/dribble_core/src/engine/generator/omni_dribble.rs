//! Omnidirectional dribble
//!
//! Body stays put. Every dash direction on the grid is combined with every
//! trap angle (where the ball ends relative to the agent) and a short dash
//! range; one candidate survives per dash direction.

use super::feasibility::{evaluate_branch, DribbleContext, RejectStats};
use super::{dribble_candidate, keep_safer, CourseGenerator};
use crate::engine::action::Candidate;
use crate::engine::kinematics::CachePlan;
use crate::engine::types::polar;

#[derive(Debug, Clone, Copy, Default)]
pub struct OmniDribbleGenerator;

impl OmniDribbleGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CourseGenerator for OmniDribbleGenerator {
    fn name(&self) -> &'static str {
        "omniDribble"
    }

    fn search(&self, ctx: &DribbleContext<'_>, candidates: &mut Vec<Candidate>, stats: &mut RejectStats) {
        let cfg = &ctx.config.omni;
        let body = ctx.agent.body;
        let power = ctx.config.server.max_dash_power;
        let trap_dist = ctx.trap_distance();
        let dash_divs = cfg.dash_dir_divisions.max(1);
        let trap_divs = cfg.trap_angle_divisions.max(1);

        for i in 0..dash_divs {
            let dash_dir = body + 360.0 * i as f64 / dash_divs as f64;
            let cache = ctx.simulate_agent(CachePlan {
                n_kick: 1,
                target_body: body,
                n_turn: 0,
                dash_dir,
                n_dash: cfg.max_dash,
                dash_power: power,
            });

            let mut best: Option<Candidate> = None;
            for j in 0..trap_divs {
                let trap_dir = body + 360.0 * j as f64 / trap_divs as f64;
                for n_dash in cfg.min_dash..=cfg.max_dash {
                    let n_total = 1 + n_dash;
                    let agent_end = match cache.at(n_total as usize) {
                        Some(step) => step,
                        None => break,
                    };
                    let trap = agent_end.pos + polar(trap_dist, trap_dir);
                    let first_vel = ctx.first_vel_to(&trap, n_total);
                    if let Some(branch) = evaluate_branch(ctx, &cache, n_dash, Some(first_vel), stats) {
                        keep_safer(&mut best, dribble_candidate(ctx, &cache, branch, self.name()));
                    }
                }
            }

            if let Some(candidate) = best {
                candidates.push(candidate);
            }
        }
    }
}
