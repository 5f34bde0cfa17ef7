//! Dribble planning engine
//!
//! Data flow per cycle:
//! `WorldState` -> generators (stepper + classifier) -> pruning -> ranked
//! `CooperativeAction`s -> `Commitment`, driven once per cycle by the caller.

pub mod action;
pub mod commitment;
pub mod config;
pub mod generator;
pub mod kinematics; // Kinematic stepper, kick model, agent cache
pub mod physics_constants;
pub mod planner;
pub mod player_type;
pub mod safety;
pub mod scenario_loader; // YAML snapshot fixtures
pub mod stamina;
pub mod types;
pub mod world;

mod contract_tests; // Contract Verification CI

pub use action::{ActionKind, Candidate, CooperativeAction, SafetyLevel, StepCounts};
pub use commitment::{AbortReason, Commitment, CommitmentState, ExecutionOutcome, PlayerCommand};
pub use config::PlannerConfig;
pub use generator::{
    CourseGenerator, GeneratorOutput, KeepDribbleGenerator, Memoized, OmniDribbleGenerator,
    RejectReason, RejectStats, ShortDribbleGenerator,
};
pub use planner::DribblePlanner;
pub use safety::SafetyClassifier;
pub use types::{AngleDeg, Pitch, Vec2};
pub use world::{AgentState, BallState, GameTime, OpponentState, WorldState};
