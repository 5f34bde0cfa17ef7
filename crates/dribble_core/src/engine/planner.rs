//! Dribble planner facade
//!
//! Owns one memoized instance of each generator and merges their pruned
//! candidates into the ranked list handed to the caller's plan evaluator.

use crate::engine::action::{preference_order, Candidate, CooperativeAction};
use crate::engine::config::PlannerConfig;
use crate::engine::generator::{
    GeneratorOutput, KeepDribbleGenerator, Memoized, OmniDribbleGenerator, ShortDribbleGenerator,
};
use crate::engine::world::WorldState;

pub struct DribblePlanner {
    config: PlannerConfig,
    keep: Memoized<KeepDribbleGenerator>,
    short: Memoized<ShortDribbleGenerator>,
    omni: Memoized<OmniDribbleGenerator>,
}

impl Default for DribblePlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl DribblePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            keep: Memoized::new(KeepDribbleGenerator),
            short: Memoized::new(ShortDribbleGenerator),
            omni: Memoized::new(OmniDribbleGenerator),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Swap the configuration; memoized outputs are dropped.
    pub fn set_config(&mut self, config: PlannerConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.keep.invalidate();
        self.short.invalidate();
        self.omni.invalidate();
    }

    pub fn keep_output(&mut self, world: &WorldState) -> &GeneratorOutput {
        self.keep.generate(world, &self.config)
    }

    pub fn short_output(&mut self, world: &WorldState) -> &GeneratorOutput {
        self.short.generate(world, &self.config)
    }

    pub fn omni_output(&mut self, world: &WorldState) -> &GeneratorOutput {
        self.omni.generate(world, &self.config)
    }

    /// Every generator's pruned candidates, most preferred first.
    pub fn candidates(&mut self, world: &WorldState) -> Vec<Candidate> {
        let mut all: Vec<Candidate> = Vec::new();
        all.extend(self.keep.generate(world, &self.config).candidates.iter().cloned());
        all.extend(self.short.generate(world, &self.config).candidates.iter().cloned());
        all.extend(self.omni.generate(world, &self.config).candidates.iter().cloned());
        all.sort_by(preference_order);
        all
    }

    /// Ranked dribble plans for this cycle. Empty means: use another tactic.
    pub fn plan(&mut self, world: &WorldState) -> Vec<CooperativeAction> {
        let ranked: Vec<CooperativeAction> = self
            .candidates(world)
            .into_iter()
            .filter(|c| c.safety().is_committable())
            .map(|c| c.action)
            .collect();
        log::debug!("planner {}: {} ranked dribble plans", world.time, ranked.len());
        ranked
    }

    /// Head of [`plan`](Self::plan).
    pub fn best(&mut self, world: &WorldState) -> Option<CooperativeAction> {
        self.plan(world).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::SafetyLevel;
    use crate::engine::types::{AngleDeg, Vec2};
    use crate::engine::world::{AgentState, BallState, GameTime, OpponentState};

    fn world(cycle: u64) -> WorldState {
        WorldState::new(
            GameTime::at(cycle),
            AgentState::new(9, Vec2::new(10.0, -4.0), Vec2::zeros(), AngleDeg::ZERO),
            BallState::new(Vec2::new(10.5, -4.0), Vec2::zeros()),
        )
        .with_opponent(OpponentState::new(3, Vec2::new(18.0, -4.0), AngleDeg::new(180.0)))
    }

    #[test]
    fn test_plan_is_ranked_by_preference() {
        let mut planner = DribblePlanner::default();
        let wm = world(100);
        let candidates = planner.candidates(&wm);
        assert!(!candidates.is_empty());
        for pair in candidates.windows(2) {
            assert_ne!(preference_order(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
        }
        let plans = planner.plan(&wm);
        assert!(plans.iter().all(|a| a.safety > SafetyLevel::Failure));
        assert_eq!(planner.best(&wm), plans.first().cloned());
    }

    #[test]
    fn test_no_plan_without_ball() {
        let mut planner = DribblePlanner::default();
        let mut wm = world(100);
        wm.ball.pos = Vec2::new(20.0, 10.0);
        assert!(planner.plan(&wm).is_empty());
        assert!(planner.best(&wm).is_none());
    }

    #[test]
    fn test_set_config_invalidates() {
        let mut planner = DribblePlanner::default();
        let wm = world(100);
        planner.keep_output(&wm);
        let mut config = PlannerConfig::cautious();
        config.keep.max_kick_dash = 1;
        config.keep.min_kick_dash = 1;
        planner.set_config(config);
        let after = planner.keep_output(&wm);
        assert_eq!(after.time, wm.time);
        assert!(after.candidates.iter().all(|c| c.dash_count() <= 1));
    }
}
