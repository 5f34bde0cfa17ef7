//! # dribble_core - Multi-step Dribble Planning Engine
//!
//! Planning and commitment core for a single agent carrying the ball in a
//! simulated 2D soccer server.
//!
//! ## Features
//! - Kinematic stepper for agent and ball (dash grid, stamina, kick model)
//! - Opponent reach-cycle estimate and four-level safety classifier
//! - Keep / short / omni dribble generators with per-level pruning
//! - Per-cycle memoization keyed by game time
//! - Commitment state machine with per-cycle re-validation
//!
//! ## Usage
//! ```rust
//! use dribble_core::engine::{
//!     AgentState, AngleDeg, BallState, Commitment, DribblePlanner, GameTime, Vec2, WorldState,
//! };
//!
//! let world = WorldState::new(
//!     GameTime::at(100),
//!     AgentState::new(9, Vec2::zeros(), Vec2::zeros(), AngleDeg::ZERO),
//!     BallState::new(Vec2::new(0.5, 0.0), Vec2::zeros()),
//! );
//! let mut planner = DribblePlanner::default();
//! let mut commitment = Commitment::new();
//! if let Some(plan) = planner.best(&world) {
//!     commitment.adopt(plan, world.time);
//!     let _command = commitment.step(&world, planner.config());
//! }
//! ```

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Physics helpers take positions, velocities and params side by side
#![allow(clippy::too_many_arguments)]
// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod engine;
pub mod error;

pub use engine::{
    Commitment, CooperativeAction, DribblePlanner, PlannerConfig, SafetyLevel, WorldState,
};
pub use error::{ConfigError, Result, ScenarioError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
