//! Commitment Module
//!
//! 선택된 플랜을 한 사이클에 한 명령씩 실행하는 상태 기계.
//!
//! ```text
//! Idle --adopt--> Executing --last command sent / target reached--> Completed
//!                     |
//!                     +--validity check fails--> Aborted
//! ```
//!
//! - `command`: primitive commands and their synthesis per action category
//! - `validity`: the checks run before every execution
//!
//! The caller owns the `Commitment` and drives it once per cycle; on
//! Completed or Aborted it asks the planner for a fresh plan.

pub mod command;
pub mod validity;

pub use command::{next_phase, synthesize, Phase, PlayerCommand};
pub use validity::AbortReason;

use crate::engine::action::{ActionKind, CooperativeAction, SafetyLevel};
use crate::engine::config::PlannerConfig;
use crate::engine::types::VecExt;
use crate::engine::world::{GameTime, WorldState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitmentState {
    Idle,
    Executing,
    Completed,
    Aborted(AbortReason),
}

/// Result of one [`Commitment::step`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExecutionOutcome {
    /// Send this command now
    Command(PlayerCommand),
    Completed,
    Aborted(AbortReason),
    /// Nothing held
    Idle,
}

/// A held plan and its execution progress.
///
/// The action's step counters are consumed in place; keep a clone before
/// [`adopt`](Self::adopt) if the original plan is still needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Commitment {
    state: CommitmentState,
    action: Option<CooperativeAction>,
    expected_cycle: u64,
    executed: u32,
}

impl Default for Commitment {
    fn default() -> Self {
        Self::new()
    }
}

impl Commitment {
    pub fn new() -> Self {
        Self {
            state: CommitmentState::Idle,
            action: None,
            expected_cycle: 0,
            executed: 0,
        }
    }

    /// Take over `action`, starting execution on the cycle of `time`.
    ///
    /// A Failure plan is refused and the commitment stays Idle.
    pub fn adopt(&mut self, action: CooperativeAction, time: GameTime) -> bool {
        if action.safety == SafetyLevel::Failure {
            log::debug!("{} refusing to adopt failing plan {}", time, action);
            self.reset();
            return false;
        }
        log::debug!("{} adopt {}", time, action);
        self.state = CommitmentState::Executing;
        self.action = Some(action);
        self.expected_cycle = time.cycle;
        self.executed = 0;
        true
    }

    /// Drive one cycle: validate, then emit the next primitive command.
    ///
    /// The call that emits the last command also moves to Completed.
    /// Outside the Executing state this is a no-op returning `Idle`.
    pub fn step(&mut self, world: &WorldState, config: &PlannerConfig) -> ExecutionOutcome {
        if self.state != CommitmentState::Executing {
            return ExecutionOutcome::Idle;
        }
        let Some(action) = self.action.as_mut() else {
            self.state = CommitmentState::Idle;
            return ExecutionOutcome::Idle;
        };

        let Some(phase) = next_phase(action) else {
            log::info!("{} completed {} after {} commands", world.time, action.description, self.executed);
            self.state = CommitmentState::Completed;
            return ExecutionOutcome::Completed;
        };

        if let Err(reason) = validity::check(action, world, self.expected_cycle, self.executed, config) {
            log::info!("{} aborted {}: {}", world.time, action.description, reason);
            action.steps.kick = 0;
            action.steps.turn = 0;
            action.steps.dash = 0;
            self.state = CommitmentState::Aborted(reason);
            return ExecutionOutcome::Aborted(reason);
        }

        if self.executed > 0
            && matches!(action.kind, ActionKind::Dribble { .. })
            && action.steps.kick == 0
            && world.ball.pos.dist(&action.target_ball_pos) <= config.commitment.target_tolerance_m
        {
            log::info!("{} completed {}: ball at target", world.time, action.description);
            self.state = CommitmentState::Completed;
            return ExecutionOutcome::Completed;
        }

        let command = synthesize(action, phase, world, config);
        match phase {
            Phase::Kick => action.steps.kick -= 1,
            Phase::Turn => action.steps.turn -= 1,
            Phase::Dash => action.steps.dash -= 1,
        }
        self.executed += 1;
        self.expected_cycle = world.time.cycle + 1;
        log::trace!("{} execute {} ({} left)", world.time, command, action.steps.total());
        if action.steps.is_exhausted() {
            log::info!("{} completed {} after {} commands", world.time, action.description, self.executed);
            self.state = CommitmentState::Completed;
        }
        ExecutionOutcome::Command(command)
    }

    pub fn state(&self) -> CommitmentState {
        self.state
    }

    pub fn action(&self) -> Option<&CooperativeAction> {
        self.action.as_ref()
    }

    /// Steps still to execute (0 when nothing is held).
    pub fn remaining(&self) -> u32 {
        self.action.as_ref().map_or(0, |a| a.steps.total())
    }

    /// Commands emitted since adoption.
    pub fn executed(&self) -> u32 {
        self.executed
    }

    pub fn is_active(&self) -> bool {
        self.state == CommitmentState::Executing
    }

    /// Drop the held plan.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
