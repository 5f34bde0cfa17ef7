//! Geometry primitives shared by every planner module

pub mod angle;
pub mod pitch;
pub mod vec2;

pub use angle::AngleDeg;
pub use pitch::Pitch;
pub use vec2::{distance_to_segment, polar, Vec2, VecExt};
