//! Action Module
//!
//! Plan values produced by the generators and consumed by the commitment:
//! - `cooperative_action`: `CooperativeAction`, `ActionKind`, `StepCounts`, `SafetyLevel`
//! - `candidate`: search-time `Candidate`, `erase_redundant`, `get_best`

pub mod candidate;
pub mod cooperative_action;

pub use candidate::{erase_redundant, get_best, preference_order, redundancy_order, Candidate};
pub use cooperative_action::{ActionKind, CooperativeAction, SafetyLevel, StepCounts};
