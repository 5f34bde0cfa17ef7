/// candidate.rs
/// Search-time candidate + pruning/selection
use super::cooperative_action::{CooperativeAction, SafetyLevel};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A generated plan with the two metrics pruning looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub action: CooperativeAction,
    /// Distance from the final ball position to the nearest opponent
    pub opponent_dist: f64,
    /// Agent displacement to reach its final position
    pub self_move_dist: f64,
}

impl Candidate {
    pub fn new(action: CooperativeAction, opponent_dist: f64, self_move_dist: f64) -> Self {
        Self {
            action,
            opponent_dist,
            self_move_dist,
        }
    }

    #[inline]
    pub fn safety(&self) -> SafetyLevel {
        self.action.safety
    }

    #[inline]
    pub fn dash_count(&self) -> u32 {
        self.action.dash_count()
    }
}

/// ============================================================================
/// Orderings
/// ============================================================================

/// Pruning order: safety desc, dash count desc, clearance desc.
pub fn redundancy_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.safety()
        .cmp(&a.safety())
        .then_with(|| b.dash_count().cmp(&a.dash_count()))
        .then_with(|| {
            b.opponent_dist
                .partial_cmp(&a.opponent_dist)
                .unwrap_or(Ordering::Equal)
        })
}

/// Preference order: dash count desc, safety desc, clearance desc.
///
/// `Ordering::Less` means `a` is preferred.
pub fn preference_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.dash_count()
        .cmp(&a.dash_count())
        .then_with(|| b.safety().cmp(&a.safety()))
        .then_with(|| {
            b.opponent_dist
                .partial_cmp(&a.opponent_dist)
                .unwrap_or(Ordering::Equal)
        })
}

/// ============================================================================
/// erase_redundant / get_best
/// ============================================================================

/// Keep one representative per safety level.
///
/// After sorting by [`redundancy_order`] the first candidate of each level is
/// the most progressed, best-cleared one; the rest are dropped. At most four
/// entries remain, ordered Safe first.
pub fn erase_redundant(candidates: &mut Vec<Candidate>) {
    // stable sort: ties keep generation order
    candidates.sort_by(redundancy_order);
    let mut last_level: Option<SafetyLevel> = None;
    candidates.retain(|c| {
        if last_level == Some(c.safety()) {
            false
        } else {
            last_level = Some(c.safety());
            true
        }
    });
}

/// Index of the preferred candidate, `None` when the list is empty.
///
/// A later candidate only replaces the current best when it is strictly
/// preferred, so ties resolve to the earlier entry.
pub fn get_best(candidates: &[Candidate]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) => {
                if preference_order(c, &candidates[b]) == Ordering::Less {
                    best = Some(i);
                }
            }
        }
    }
    best
}
