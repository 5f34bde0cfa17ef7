//! World-state snapshot
//!
//! Built once per cycle by the perception layer (outside this crate) and
//! consumed read-only by the generators, the classifier and the commitment.
//! Observation ages (`*_count`) are in cycles: 0 = seen this cycle.

use crate::engine::config::ServerParams;
use crate::engine::player_type::PlayerType;
use crate::engine::stamina::StaminaModel;
use crate::engine::types::{AngleDeg, Pitch, Vec2, VecExt};
use serde::{Deserialize, Serialize};
use std::fmt;

fn zero_vec() -> Vec2 {
    Vec2::zeros()
}

/// Simulator clock. `stopped` counts cycles while play is halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GameTime {
    pub cycle: u64,
    #[serde(default)]
    pub stopped: u32,
}

impl GameTime {
    pub const fn new(cycle: u64, stopped: u32) -> Self {
        Self { cycle, stopped }
    }

    pub const fn at(cycle: u64) -> Self {
        Self { cycle, stopped: 0 }
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.cycle, self.stopped)
    }
}

/// Collisions the server reported for the agent this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionFlags {
    #[serde(default)]
    pub ball: bool,
    #[serde(default)]
    pub player: bool,
}

/// The controlled agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub unum: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    pub body: AngleDeg,
    #[serde(default)]
    pub stamina: StaminaModel,
    #[serde(default)]
    pub player_type: PlayerType,
    #[serde(default)]
    pub collision: CollisionFlags,
    /// Cycles left frozen after our own tackle
    #[serde(default)]
    pub tackle_cycles: u32,
}

impl AgentState {
    pub fn new(unum: u8, pos: Vec2, vel: Vec2, body: AngleDeg) -> Self {
        Self {
            unum,
            pos,
            vel,
            body,
            stamina: StaminaModel::default(),
            player_type: PlayerType::default(),
            collision: CollisionFlags::default(),
            tackle_cycles: 0,
        }
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.tackle_cycles > 0
    }
}

/// The ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub pos: Vec2,
    #[serde(default = "zero_vec")]
    pub vel: Vec2,
    #[serde(default)]
    pub pos_count: u32,
    #[serde(default)]
    pub vel_count: u32,
}

impl BallState {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            pos_count: 0,
            vel_count: 0,
        }
    }
}

/// One adversary as last observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentState {
    pub unum: u8,
    pub pos: Vec2,
    #[serde(default = "zero_vec")]
    pub vel: Vec2,
    #[serde(default)]
    pub body: AngleDeg,
    #[serde(default)]
    pub pos_count: u32,
    #[serde(default)]
    pub vel_count: u32,
    #[serde(default)]
    pub body_count: u32,
    /// Cycles left before a tackling opponent can move again
    #[serde(default)]
    pub tackle_cycles: u32,
    #[serde(default)]
    pub is_goalie: bool,
    #[serde(default)]
    pub player_type: PlayerType,
}

impl OpponentState {
    pub fn new(unum: u8, pos: Vec2, body: AngleDeg) -> Self {
        Self {
            unum,
            pos,
            vel: Vec2::zeros(),
            body,
            pos_count: 0,
            vel_count: 0,
            body_count: 0,
            tackle_cycles: 0,
            is_goalie: false,
            player_type: PlayerType::default(),
        }
    }

    #[inline]
    pub fn is_tackling(&self) -> bool {
        self.tackle_cycles > 0
    }

    /// Radius within which this opponent seizes the ball at `ball_pos`.
    ///
    /// A goalkeeper inside the area it defends uses the catchable area.
    pub fn seizing_radius(&self, ball_pos: &Vec2, sp: &ServerParams, pitch: &Pitch) -> f64 {
        let kickable = self.player_type.kickable_area(sp);
        if self.is_goalie && pitch.in_their_penalty_area(ball_pos) {
            kickable.max(sp.catchable_area)
        } else {
            kickable
        }
    }
}

/// Everything the planner knows this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub time: GameTime,
    pub agent: AgentState,
    pub ball: BallState,
    #[serde(default)]
    pub opponents: Vec<OpponentState>,
}

impl WorldState {
    pub fn new(time: GameTime, agent: AgentState, ball: BallState) -> Self {
        Self {
            time,
            agent,
            ball,
            opponents: Vec::new(),
        }
    }

    pub fn with_opponent(mut self, opponent: OpponentState) -> Self {
        self.opponents.push(opponent);
        self
    }

    /// Ball position relative to the agent, in field orientation.
    #[inline]
    pub fn ball_rel_agent(&self) -> Vec2 {
        self.ball.pos - self.agent.pos
    }

    #[inline]
    pub fn agent_dist_to_ball(&self) -> f64 {
        self.ball.pos.dist(&self.agent.pos)
    }

    /// Whether the agent can kick the ball right now.
    pub fn agent_kickable(&self, sp: &ServerParams) -> bool {
        self.agent_dist_to_ball() <= self.agent.player_type.kickable_area(sp)
    }

    /// Opponents within `max_dist` of the agent, nearest first.
    pub fn opponents_from_agent(&self, max_dist: f64) -> Vec<&OpponentState> {
        let mut list: Vec<(f64, &OpponentState)> = self
            .opponents
            .iter()
            .map(|o| (o.pos.dist(&self.agent.pos), o))
            .filter(|(d, _)| *d <= max_dist)
            .collect();
        list.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.unum.cmp(&b.1.unum)));
        list.into_iter().map(|(_, o)| o).collect()
    }

    /// First opponent (nearest to the ball) already able to act on it.
    pub fn opponent_holding_ball(&self, sp: &ServerParams, pitch: &Pitch) -> Option<&OpponentState> {
        self.opponents
            .iter()
            .filter(|o| o.pos.dist(&self.ball.pos) <= o.seizing_radius(&self.ball.pos, sp, pitch))
            .min_by(|a, b| {
                a.pos
                    .dist(&self.ball.pos)
                    .total_cmp(&b.pos.dist(&self.ball.pos))
                    .then(a.unum.cmp(&b.unum))
            })
    }

    /// Distance from `point` to the nearest opponent (infinite when none).
    pub fn nearest_opponent_dist(&self, point: &Vec2) -> f64 {
        self.opponents
            .iter()
            .map(|o| o.pos.dist(point))
            .fold(f64::INFINITY, f64::min)
    }
}
