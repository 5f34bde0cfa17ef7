//! Safety Classifier
//!
//! Maps "adversary reach cycles vs. plan step" to a [`SafetyLevel`]. The
//! result for a ball position is the worst level over every opponent inside
//! the distance cutoff; the first Failure ends the scan.

use super::reachability::{opponent_reach_cycles, ReachEstimate};
use crate::engine::action::SafetyLevel;
use crate::engine::config::{PlannerConfig, SafetyThresholds, ServerParams};
use crate::engine::types::{Pitch, Vec2};
use crate::engine::world::{OpponentState, WorldState};

/// Tier for reach estimate `a` against plan step `s`.
///
/// `in_their_box` is whether the ball sits in the penalty area the opponents
/// defend; there a non-goalkeeper reaching exactly on time only makes the
/// step Dangerous.
pub fn level_for(
    a: i32,
    s: i32,
    in_their_box: bool,
    is_goalie: bool,
    thresholds: &SafetyThresholds,
) -> SafetyLevel {
    if a <= s - 1 {
        SafetyLevel::Failure
    } else if a <= s {
        if in_their_box && !is_goalie {
            SafetyLevel::Dangerous
        } else {
            SafetyLevel::Failure
        }
    } else if a <= s + thresholds.dangerous_margin {
        SafetyLevel::Dangerous
    } else if a <= s + thresholds.maybe_dangerous_margin {
        SafetyLevel::MaybeDangerous
    } else {
        SafetyLevel::Safe
    }
}

/// Verdict for one position with the opponent that decided it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub level: SafetyLevel,
    /// Opponent with the worst level (`None` when nobody is in range)
    pub decisive: Option<ReachEstimate>,
}

/// Per-snapshot classifier.
///
/// Opponents inside the cutoff are collected once, nearest first, and reused
/// for every `classify` call against the same snapshot.
pub struct SafetyClassifier<'a> {
    opponents: Vec<&'a OpponentState>,
    sp: &'a ServerParams,
    thresholds: &'a SafetyThresholds,
    pitch: Pitch,
}

impl<'a> SafetyClassifier<'a> {
    pub fn new(world: &'a WorldState, config: &'a PlannerConfig) -> Self {
        Self {
            opponents: world.opponents_from_agent(config.safety.opponent_cutoff_m),
            sp: &config.server,
            thresholds: &config.safety,
            pitch: Pitch::from_server(&config.server),
        }
    }

    /// Number of opponents the classifier looks at.
    pub fn opponent_count(&self) -> usize {
        self.opponents.len()
    }

    /// Safety of the ball at `ball_pos` on plan step `step`.
    pub fn classify(&self, ball_pos: &Vec2, step: u32) -> SafetyLevel {
        self.classify_detailed(ball_pos, step).level
    }

    pub fn classify_detailed(&self, ball_pos: &Vec2, step: u32) -> Classification {
        let in_box = self.pitch.in_their_penalty_area(ball_pos);
        let mut result = Classification {
            level: SafetyLevel::Safe,
            decisive: None,
        };

        for opponent in &self.opponents {
            let est = opponent_reach_cycles(opponent, ball_pos, step, self.sp, &self.pitch, self.thresholds);
            let level = level_for(est.cycles(), step as i32, in_box, opponent.is_goalie, self.thresholds);
            if result.decisive.is_none() || level < result.level {
                result.level = level;
                result.decisive = Some(est);
            }
            if level == SafetyLevel::Failure {
                log::trace!(
                    "opponent {} seizes ball at ({:.2}, {:.2}) step {} (reach {})",
                    opponent.unum,
                    ball_pos.x,
                    ball_pos.y,
                    step,
                    est.cycles()
                );
                break;
            }
        }
        result
    }

    /// Worst level over a path where `positions[i]` is the ball on step `first_step + i`.
    pub fn classify_path(&self, positions: &[Vec2], first_step: u32) -> SafetyLevel {
        let mut worst = SafetyLevel::Safe;
        for (i, pos) in positions.iter().enumerate() {
            worst = worst.worst(self.classify(pos, first_step + i as u32));
            if worst == SafetyLevel::Failure {
                break;
            }
        }
        worst
    }
}
