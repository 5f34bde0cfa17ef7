//! Per-cycle memoization of a generator
//!
//! The output is keyed by the snapshot's `GameTime`: a second call within the
//! same cycle returns the stored output untouched, a call for any other time
//! recomputes. The wrapper is owned by whoever drives the planner, so the
//! "last update" marker is explicit state rather than a global.

use super::{CourseGenerator, GeneratorOutput};
use crate::engine::config::PlannerConfig;
use crate::engine::world::{GameTime, WorldState};

pub struct Memoized<G> {
    inner: G,
    cached: Option<GeneratorOutput>,
    hits: u64,
    misses: u64,
}

impl<G: CourseGenerator> Memoized<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cached: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Output for `world`, computed at most once per `world.time`.
    pub fn generate(&mut self, world: &WorldState, config: &PlannerConfig) -> &GeneratorOutput {
        let fresh = matches!(&self.cached, Some(out) if out.time == world.time);
        if fresh {
            self.hits += 1;
            log::debug!("{} {}: memo hit #{}", self.inner.name(), world.time, self.hits);
        } else {
            self.misses += 1;
            self.cached = None;
        }
        let inner = &self.inner;
        self.cached.get_or_insert_with(|| inner.generate(world, config))
    }

    /// Drop the stored output (e.g. after a config change mid-cycle).
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Time of the stored output.
    pub fn last_update(&self) -> Option<GameTime> {
        self.cached.as_ref().map(|out| out.time)
    }

    pub fn cached(&self) -> Option<&GeneratorOutput> {
        self.cached.as_ref()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}
