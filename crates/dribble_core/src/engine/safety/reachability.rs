//! Adversary reachability
//!
//! How many cycles an opponent needs before it can act on the ball at a
//! predicted position: turn cycles + dash cycles - unseen discount + tackle
//! recovery.

use crate::engine::config::{ConfidenceDiscount, SafetyThresholds, ServerParams};
use crate::engine::kinematics::predict_turn_cycles;
use crate::engine::types::{AngleDeg, Pitch, Vec2, VecExt};
use crate::engine::world::OpponentState;
use serde::{Deserialize, Serialize};

/// Breakdown of one opponent's reach estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachEstimate {
    pub unum: u8,
    pub turn_cycles: u32,
    pub dash_cycles: i32,
    pub discount: i32,
    pub tackle_penalty: u32,
}

impl ReachEstimate {
    /// The adversary-cycle estimate `A` compared against the plan step.
    #[inline]
    pub fn cycles(&self) -> i32 {
        self.turn_cycles as i32 + self.dash_cycles - self.discount + self.tackle_penalty as i32
    }
}

/// Turn cycles before the opponent faces the ball closely enough to dash at it.
///
/// The allowed facing error is the angle the seizing radius subtends at
/// `dist`, never below `min_margin_deg`. An opponent whose body direction is
/// stale (`body_count > 1`) is assumed to already face the ball.
pub fn predict_opponent_turn_cycles(
    opponent: &OpponentState,
    opp_pos: &Vec2,
    ball_pos: &Vec2,
    seizing_radius: f64,
    sp: &ServerParams,
    min_margin_deg: f64,
) -> u32 {
    if opponent.body_count > 1 {
        return 0;
    }
    let dist = opp_pos.dist(ball_pos);
    if dist <= seizing_radius {
        return 0;
    }
    let margin = AngleDeg::asin_deg(seizing_radius / dist).max(min_margin_deg);
    let target = (ball_pos - opp_pos).th();
    let (n_turn, _) = predict_turn_cycles(
        &opponent.player_type,
        sp,
        opponent.body,
        opponent.vel.norm(),
        target,
        margin,
    );
    n_turn
}

/// Cycles discounted for an opponent that went unseen for `pos_count` cycles.
pub fn confidence_discount(
    pos_count: u32,
    ball_pos: &Vec2,
    pitch: &Pitch,
    table: &ConfidenceDiscount,
) -> i32 {
    let cap = if pitch.near_either_goal(ball_pos, table.near_goal_depth_m) {
        table.near_goal_cap
    } else {
        table.midfield_cap
    };
    let raw = (pos_count as f64 * table.per_unseen_cycle).round() as i32;
    raw.clamp(0, cap.max(0))
}

/// Reach estimate of one opponent for the ball at `ball_pos` on plan step `step`.
///
/// The opponent is first projected along its current velocity for `step`
/// coasting cycles.
pub fn opponent_reach_cycles(
    opponent: &OpponentState,
    ball_pos: &Vec2,
    step: u32,
    sp: &ServerParams,
    pitch: &Pitch,
    thresholds: &SafetyThresholds,
) -> ReachEstimate {
    let ptype = &opponent.player_type;
    let opp_pos = ptype.inertia_point(&opponent.pos, &opponent.vel, step);
    let radius = opponent.seizing_radius(ball_pos, sp, pitch);

    let gap = opp_pos.dist(ball_pos) - radius - thresholds.reach_slack_m;
    let dash_cycles = ptype.cycles_to_reach_distance(gap, sp);
    let turn_cycles = if gap > 0.0 {
        predict_opponent_turn_cycles(
            opponent,
            &opp_pos,
            ball_pos,
            radius,
            sp,
            thresholds.min_turn_margin_deg,
        )
    } else {
        0
    };

    let tackle_penalty = if opponent.is_tackling() {
        opponent.tackle_cycles.min(sp.tackle_cycles)
    } else {
        0
    };

    ReachEstimate {
        unum: opponent.unum,
        turn_cycles,
        dash_cycles,
        discount: confidence_discount(opponent.pos_count, ball_pos, pitch, &thresholds.discount),
        tackle_penalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ServerParams, Pitch, SafetyThresholds) {
        (ServerParams::default(), Pitch::default(), SafetyThresholds::default())
    }

    #[test]
    fn test_facing_opponent_needs_no_turn() {
        let (sp, pitch, th) = setup();
        let opp = OpponentState::new(2, Vec2::new(5.0, 0.0), AngleDeg::new(180.0));
        let est = opponent_reach_cycles(&opp, &Vec2::new(0.3, 0.0), 3, &sp, &pitch, &th);
        assert_eq!(est.turn_cycles, 0);
        // 4.7 - 1.085 = 3.615 m at 1 m/cycle
        assert_eq!(est.dash_cycles, 4);
        assert_eq!(est.cycles(), 4);
    }

    #[test]
    fn test_back_turned_opponent_pays_turn() {
        let (sp, pitch, th) = setup();
        let opp = OpponentState::new(2, Vec2::new(5.0, 0.0), AngleDeg::ZERO);
        let est = opponent_reach_cycles(&opp, &Vec2::new(0.3, 0.0), 3, &sp, &pitch, &th);
        assert_eq!(est.turn_cycles, 1);
        assert_eq!(est.cycles(), 5);
    }

    #[test]
    fn test_stale_body_assumed_aligned() {
        let (sp, pitch, th) = setup();
        let mut opp = OpponentState::new(2, Vec2::new(5.0, 0.0), AngleDeg::ZERO);
        opp.body_count = 3;
        let est = opponent_reach_cycles(&opp, &Vec2::new(0.3, 0.0), 3, &sp, &pitch, &th);
        assert_eq!(est.turn_cycles, 0);
    }

    #[test]
    fn test_discount_caps() {
        let pitch = Pitch::default();
        let table = ConfidenceDiscount::default();
        assert_eq!(confidence_discount(0, &Vec2::zeros(), &pitch, &table), 0);
        assert_eq!(confidence_discount(2, &Vec2::zeros(), &pitch, &table), 2);
        assert_eq!(confidence_discount(10, &Vec2::zeros(), &pitch, &table), 3);
        assert_eq!(confidence_discount(10, &Vec2::new(45.0, 0.0), &pitch, &table), 1);
        assert_eq!(confidence_discount(10, &Vec2::new(-45.0, 5.0), &pitch, &table), 1);
    }

    #[test]
    fn test_tackling_opponent_penalized() {
        let (sp, pitch, th) = setup();
        let mut opp = OpponentState::new(2, Vec2::new(5.0, 0.0), AngleDeg::new(180.0));
        opp.tackle_cycles = 6;
        let est = opponent_reach_cycles(&opp, &Vec2::new(0.3, 0.0), 3, &sp, &pitch, &th);
        assert_eq!(est.tackle_penalty, 6);
        assert_eq!(est.cycles(), 10);
    }

    #[test]
    fn test_moving_opponent_projected() {
        let (sp, pitch, th) = setup();
        let mut opp = OpponentState::new(2, Vec2::new(8.0, 0.0), AngleDeg::new(180.0));
        opp.vel = Vec2::new(-1.0, 0.0);
        let still = OpponentState::new(3, Vec2::new(8.0, 0.0), AngleDeg::new(180.0));
        let ball = Vec2::new(0.3, 0.0);
        let a = opponent_reach_cycles(&opp, &ball, 2, &sp, &pitch, &th);
        let b = opponent_reach_cycles(&still, &ball, 2, &sp, &pitch, &th);
        assert!(a.cycles() < b.cycles());
    }
}
