//! Short-style dribble
//!
//! Ring of target directions around the agent. Each direction costs some
//! turn cycles; directions needing more than `max_turns` are skipped. For the
//! rest: kick, turn(s), then `max_dash` down to `min_dash` dashes, keeping the
//! safest (then longest) result and stopping once one is Safe.

use super::feasibility::{evaluate_branch, DribbleContext, RejectReason, RejectStats};
use super::{dribble_candidate, is_settled, keep_safer, CourseGenerator};
use crate::engine::action::Candidate;
use crate::engine::kinematics::{predict_turn_cycles, CachePlan};
use crate::engine::types::{polar, AngleDeg};

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortDribbleGenerator;

impl ShortDribbleGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CourseGenerator for ShortDribbleGenerator {
    fn name(&self) -> &'static str {
        "shortDribble"
    }

    fn search(&self, ctx: &DribbleContext<'_>, candidates: &mut Vec<Candidate>, stats: &mut RejectStats) {
        let cfg = &ctx.config.short;
        let sp = &ctx.config.server;
        let ptype = &ctx.world.agent.player_type;
        let power = sp.max_dash_power;
        let trap_dist = ctx.trap_distance();
        let divisions = cfg.angle_divisions.max(1);
        // the kick cycle comes first, turns start from the decayed speed
        let speed_after_kick = ctx.agent.vel.norm() * ptype.player_decay;

        for i in 0..divisions {
            let dir = AngleDeg::new(360.0 * i as f64 / divisions as f64);
            let (n_turn, _) =
                predict_turn_cycles(ptype, sp, ctx.agent.body, speed_after_kick, dir, cfg.turn_tolerance_deg);
            if n_turn > cfg.max_turns {
                stats.record(RejectReason::TooManyTurns);
                continue;
            }

            let cache = ctx.simulate_agent(CachePlan {
                n_kick: 1,
                target_body: dir,
                n_turn,
                dash_dir: dir,
                n_dash: cfg.max_dash,
                dash_power: power,
            });

            let mut best: Option<Candidate> = None;
            for n_dash in (cfg.min_dash..=cfg.max_dash).rev() {
                let n_total = 1 + n_turn + n_dash;
                let agent_end = match cache.at(n_total as usize) {
                    Some(step) => step,
                    None => continue,
                };
                let trap = agent_end.pos + polar(trap_dist, dir);
                let first_vel = ctx.first_vel_to(&trap, n_total);
                if let Some(branch) = evaluate_branch(ctx, &cache, n_dash, Some(first_vel), stats) {
                    let settled = is_settled(branch.safety);
                    keep_safer(&mut best, dribble_candidate(ctx, &cache, branch, self.name()));
                    if settled {
                        break;
                    }
                }
            }

            if let Some(candidate) = best {
                candidates.push(candidate);
            }
        }
    }
}
