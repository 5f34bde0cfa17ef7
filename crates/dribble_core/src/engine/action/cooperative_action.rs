/// cooperative_action.rs
/// CooperativeAction: one complete multi-step plan for one agent
use crate::engine::types::{AngleDeg, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter};

/// ============================================================================
/// SafetyLevel
/// ============================================================================

/// Classifier verdict for a plan step (ordered: Failure < ... < Safe).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, Display,
)]
pub enum SafetyLevel {
    Failure,
    Dangerous,
    MaybeDangerous,
    Safe,
}

impl SafetyLevel {
    /// Whether a plan at this level may be committed to.
    #[inline]
    pub fn is_committable(self) -> bool {
        self != SafetyLevel::Failure
    }

    /// Worst of two levels (path rule).
    #[inline]
    pub fn worst(self, other: SafetyLevel) -> SafetyLevel {
        self.min(other)
    }
}

/// ============================================================================
/// Step counts
/// ============================================================================

/// Remaining primitive commands of a plan, executed kick -> turn -> dash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct StepCounts {
    pub kick: u32,
    pub turn: u32,
    pub dash: u32,
}

impl StepCounts {
    pub const fn new(kick: u32, turn: u32, dash: u32) -> Self {
        Self { kick, turn, dash }
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.kick + self.turn + self.dash
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.total() == 0
    }

    /// Short composition tag: "dash", "kick-dash", "turn-dash", ...
    pub fn composition(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if self.kick > 0 {
            parts.push("kick");
        }
        if self.turn > 0 {
            parts.push("turn");
        }
        if self.dash > 0 {
            parts.push("dash");
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join("-")
        }
    }
}

/// ============================================================================
/// ActionKind (closed category set)
/// ============================================================================

/// Category of a plan plus the fields only that category needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum ActionKind {
    /// Carry the ball: optional kick, turns, then dashes along one direction.
    Dribble {
        /// Ball velocity right after the first kick (zero when no kick)
        first_ball_vel: Vec2,
        /// Moment of the first turn (zero when no turn)
        first_turn_moment: f64,
        /// Power of every planned dash
        dash_power: f64,
        /// Body-relative, grid-snapped dash direction
        dash_dir: AngleDeg,
    },
    Pass {
        receiver: u8,
        first_ball_vel: Vec2,
    },
    Shoot {
        first_ball_vel: Vec2,
    },
    /// Keep the ball and turn toward `target_body`
    Hold,
    /// Run without the ball
    Move {
        dash_power: f64,
        dash_dir: AngleDeg,
    },
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Dribble { .. } => "Dribble",
            ActionKind::Pass { .. } => "Pass",
            ActionKind::Shoot { .. } => "Shoot",
            ActionKind::Hold => "Hold",
            ActionKind::Move { .. } => "Move",
        }
    }

    /// Whether the plan keeps the ball near the agent until completion.
    pub fn carries_ball(&self) -> bool {
        matches!(self, ActionKind::Dribble { .. } | ActionKind::Hold)
    }
}

/// ============================================================================
/// CooperativeAction
/// ============================================================================

/// One complete multi-step plan.
///
/// Built by value by a generator. Step counts are only mutated once the
/// action has been moved into a `Commitment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooperativeAction {
    pub kind: ActionKind,
    /// Acting agent
    pub unum: u8,
    /// Ball position when the plan completes
    pub target_ball_pos: Vec2,
    pub target_agent_pos: Option<Vec2>,
    pub target_body: Option<AngleDeg>,
    pub steps: StepCounts,
    /// Worst level over every kept step
    pub safety: SafetyLevel,
    /// Diagnostics tag (generator + composition)
    pub description: String,
}

impl CooperativeAction {
    #[allow(clippy::too_many_arguments)]
    pub fn dribble(
        unum: u8,
        target_ball_pos: Vec2,
        target_agent_pos: Vec2,
        target_body: AngleDeg,
        first_ball_vel: Vec2,
        first_turn_moment: f64,
        dash_power: f64,
        dash_dir: AngleDeg,
        steps: StepCounts,
    ) -> Self {
        Self {
            kind: ActionKind::Dribble {
                first_ball_vel,
                first_turn_moment,
                dash_power,
                dash_dir,
            },
            unum,
            target_ball_pos,
            target_agent_pos: Some(target_agent_pos),
            target_body: Some(target_body),
            steps,
            safety: SafetyLevel::Safe,
            description: String::new(),
        }
    }

    pub fn pass(unum: u8, receiver: u8, first_ball_vel: Vec2, target_ball_pos: Vec2) -> Self {
        Self {
            kind: ActionKind::Pass {
                receiver,
                first_ball_vel,
            },
            unum,
            target_ball_pos,
            target_agent_pos: None,
            target_body: None,
            steps: StepCounts::new(1, 0, 0),
            safety: SafetyLevel::Safe,
            description: "pass".to_string(),
        }
    }

    pub fn shoot(unum: u8, first_ball_vel: Vec2, target_ball_pos: Vec2) -> Self {
        Self {
            kind: ActionKind::Shoot { first_ball_vel },
            unum,
            target_ball_pos,
            target_agent_pos: None,
            target_body: None,
            steps: StepCounts::new(1, 0, 0),
            safety: SafetyLevel::Safe,
            description: "shoot".to_string(),
        }
    }

    pub fn hold(unum: u8, ball_pos: Vec2, target_body: AngleDeg, n_turn: u32) -> Self {
        Self {
            kind: ActionKind::Hold,
            unum,
            target_ball_pos: ball_pos,
            target_agent_pos: None,
            target_body: Some(target_body),
            steps: StepCounts::new(0, n_turn, 0),
            safety: SafetyLevel::Safe,
            description: "hold".to_string(),
        }
    }

    pub fn move_to(unum: u8, ball_pos: Vec2, target_agent_pos: Vec2, dash_power: f64, dash_dir: AngleDeg, n_dash: u32) -> Self {
        Self {
            kind: ActionKind::Move { dash_power, dash_dir },
            unum,
            target_ball_pos: ball_pos,
            target_agent_pos: Some(target_agent_pos),
            target_body: None,
            steps: StepCounts::new(0, 0, n_dash),
            safety: SafetyLevel::Safe,
            description: "move".to_string(),
        }
    }

    pub fn with_safety(mut self, safety: SafetyLevel) -> Self {
        self.safety = safety;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Total plan length in cycles.
    #[inline]
    pub fn duration_time(&self) -> u32 {
        self.steps.total()
    }

    #[inline]
    pub fn dash_count(&self) -> u32 {
        self.steps.dash
    }
}

impl fmt::Display for CooperativeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] #{} k{} t{} d{} -> ({:.2}, {:.2}) {}",
            self.kind.name(),
            self.description,
            self.unum,
            self.steps.kick,
            self.steps.turn,
            self.steps.dash,
            self.target_ball_pos.x,
            self.target_ball_pos.y,
            self.safety
        )
    }
}
