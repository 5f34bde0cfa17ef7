//! Primitive actuator commands and their synthesis from a held plan.

use crate::engine::action::{ActionKind, CooperativeAction};
use crate::engine::config::PlannerConfig;
use crate::engine::kinematics::{first_vel_for_travel, kick_command_for, kick_rate, turn_moment_toward};
use crate::engine::types::{AngleDeg, Vec2};
use crate::engine::world::WorldState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cycle's command for the agent's actuators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerCommand {
    /// `dir` is relative to the body
    Kick { power: f64, dir: AngleDeg },
    Turn { moment: f64 },
    /// `dir` is relative to the body
    Dash { power: f64, dir: AngleDeg },
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCommand::Kick { power, dir } => write!(f, "(kick {:.2} {:.2})", power, dir.degrees()),
            PlayerCommand::Turn { moment } => write!(f, "(turn {:.2})", moment),
            PlayerCommand::Dash { power, dir } => write!(f, "(dash {:.2} {:.2})", power, dir.degrees()),
        }
    }
}

/// Which counter the next command consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Kick,
    Turn,
    Dash,
}

/// Next phase of `action` (kick, then turn, then dash), `None` when exhausted.
pub fn next_phase(action: &CooperativeAction) -> Option<Phase> {
    if action.steps.kick > 0 {
        Some(Phase::Kick)
    } else if action.steps.turn > 0 {
        Some(Phase::Turn)
    } else if action.steps.dash > 0 {
        Some(Phase::Dash)
    } else {
        None
    }
}

/// Kick that sends the ball with `first_vel` from where it is now.
///
/// Power beyond the actuator maximum is clamped with a warning.
fn kick_for_velocity(first_vel: &Vec2, world: &WorldState, config: &PlannerConfig) -> PlayerCommand {
    let sp = &config.server;
    let agent = &world.agent;
    let rate = kick_rate(&agent.pos, agent.body, &world.ball.pos, &agent.player_type, sp);
    let (power, dir, clamped) = kick_command_for(first_vel, &world.ball.vel, rate, agent.body, sp);
    if clamped {
        log::warn!(
            "{} kick power clamped to {:.1} (wanted |v|={:.3}, rate {:.4})",
            world.time,
            power,
            first_vel.norm(),
            rate
        );
    }
    PlayerCommand::Kick { power, dir }
}

/// Dash with the stamina-safe share of `power`, warning when it had to shrink.
fn dash_with(power: f64, dir: AngleDeg, world: &WorldState, config: &PlannerConfig) -> PlayerCommand {
    let safe = world
        .agent
        .stamina
        .safety_dash_power(power, &config.server, &config.stamina);
    if (safe - power).abs() > 1e-6 {
        log::warn!("{} dash power clamped {:.1} -> {:.1}", world.time, power, safe);
    }
    PlayerCommand::Dash {
        power: safe,
        dir: config.server.discretize_dash_angle(dir),
    }
}

fn turn_to(target: Option<AngleDeg>, world: &WorldState, config: &PlannerConfig) -> PlayerCommand {
    let agent = &world.agent;
    let target = target.unwrap_or(agent.body);
    PlayerCommand::Turn {
        moment: turn_moment_toward(agent.body, target, agent.vel.norm(), &agent.player_type, &config.server),
    }
}

/// Command for the next step of `action` against the current snapshot.
pub fn synthesize(action: &CooperativeAction, phase: Phase, world: &WorldState, config: &PlannerConfig) -> PlayerCommand {
    match (&action.kind, phase) {
        (ActionKind::Dribble { .. }, Phase::Kick) => {
            // re-aim from the ball's actual position over the steps left
            let displacement = action.target_ball_pos - world.ball.pos;
            let first_vel = first_vel_for_travel(&displacement, action.steps.total(), config.server.ball_decay);
            kick_for_velocity(&first_vel, world, config)
        }
        (ActionKind::Pass { first_ball_vel, .. }, Phase::Kick)
        | (ActionKind::Shoot { first_ball_vel }, Phase::Kick) => kick_for_velocity(first_ball_vel, world, config),
        (ActionKind::Dribble { dash_power, dash_dir, .. }, Phase::Dash)
        | (ActionKind::Move { dash_power, dash_dir }, Phase::Dash) => dash_with(*dash_power, *dash_dir, world, config),
        (_, Phase::Turn) => turn_to(action.target_body, world, config),
        // counters on a category that never uses them: stop the ball / stand still
        (ActionKind::Hold, Phase::Kick) | (ActionKind::Move { .. }, Phase::Kick) => {
            kick_for_velocity(&Vec2::zeros(), world, config)
        }
        (ActionKind::Pass { .. }, Phase::Dash)
        | (ActionKind::Shoot { .. }, Phase::Dash)
        | (ActionKind::Hold, Phase::Dash) => PlayerCommand::Dash {
            power: 0.0,
            dir: AngleDeg::ZERO,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::StepCounts;
    use crate::engine::world::{AgentState, BallState, GameTime};

    fn world() -> WorldState {
        WorldState::new(
            GameTime::at(1),
            AgentState::new(5, Vec2::zeros(), Vec2::zeros(), AngleDeg::ZERO),
            BallState::new(Vec2::new(0.5, 0.0), Vec2::zeros()),
        )
    }

    fn dribble(steps: StepCounts) -> CooperativeAction {
        CooperativeAction::dribble(
            5,
            Vec2::new(3.0, 0.0),
            Vec2::new(2.4, 0.0),
            AngleDeg::new(90.0),
            Vec2::new(0.7, 0.0),
            90.0,
            100.0,
            AngleDeg::ZERO,
            steps,
        )
    }

    #[test]
    fn test_phase_order() {
        assert_eq!(next_phase(&dribble(StepCounts::new(1, 1, 2))), Some(Phase::Kick));
        assert_eq!(next_phase(&dribble(StepCounts::new(0, 1, 2))), Some(Phase::Turn));
        assert_eq!(next_phase(&dribble(StepCounts::new(0, 0, 2))), Some(Phase::Dash));
        assert_eq!(next_phase(&dribble(StepCounts::default())), None);
    }

    #[test]
    fn test_dribble_kick_aims_at_target() {
        let config = PlannerConfig::default();
        let action = dribble(StepCounts::new(1, 0, 3));
        match synthesize(&action, Phase::Kick, &world(), &config) {
            PlayerCommand::Kick { power, dir } => {
                assert!(power > 0.0 && power <= 100.0);
                assert!(dir.abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_turn_and_dash() {
        let config = PlannerConfig::default();
        let action = dribble(StepCounts::new(0, 1, 3));
        assert_eq!(
            synthesize(&action, Phase::Turn, &world(), &config),
            PlayerCommand::Turn { moment: 90.0 }
        );
        assert_eq!(
            synthesize(&action, Phase::Dash, &world(), &config),
            PlayerCommand::Dash {
                power: 100.0,
                dir: AngleDeg::ZERO
            }
        );
    }

    #[test]
    fn test_tired_dash_is_clamped() {
        let config = PlannerConfig::default();
        let mut wm = world();
        wm.agent.stamina.stamina = 2740.0;
        let action = dribble(StepCounts::new(0, 0, 3));
        match synthesize(&action, Phase::Dash, &wm, &config) {
            PlayerCommand::Dash { power, .. } => assert!((power - 40.0).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_overpowered_shot_is_clamped() {
        let config = PlannerConfig::default();
        let mut wm = world();
        // ball at the edge of the kickable area behind the agent
        wm.ball.pos = Vec2::new(-1.0, 0.0);
        let shot = CooperativeAction::shoot(5, Vec2::new(3.0, 0.0), Vec2::new(52.5, 0.0));
        match synthesize(&shot, Phase::Kick, &wm, &config) {
            PlayerCommand::Kick { power, .. } => assert!((power - 100.0).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_command_display() {
        let cmd = PlayerCommand::Dash {
            power: 100.0,
            dir: AngleDeg::new(45.0),
        };
        assert_eq!(cmd.to_string(), "(dash 100.00 45.00)");
    }
}
