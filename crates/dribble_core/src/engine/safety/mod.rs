//! Adversary Reachability & Safety Classifier
//!
//! - `reachability`: per-opponent reach-cycle estimate
//! - `classifier`: tier mapping and the per-snapshot `SafetyClassifier`

pub mod classifier;
pub mod reachability;

pub use classifier::{level_for, Classification, SafetyClassifier};
pub use reachability::{
    confidence_discount, opponent_reach_cycles, predict_opponent_turn_cycles, ReachEstimate,
};
