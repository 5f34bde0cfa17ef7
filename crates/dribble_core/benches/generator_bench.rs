//! Per-cycle cost of the dribble generators.
//!
//! Run with: cargo bench --package dribble_core
//!
//! Snapshots are drawn from a seeded ChaCha stream so runs stay comparable.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dribble_core::engine::types::polar;
use dribble_core::engine::{
    AgentState, AngleDeg, BallState, CourseGenerator, DribblePlanner, GameTime, KeepDribbleGenerator,
    OmniDribbleGenerator, OpponentState, PlannerConfig, ShortDribbleGenerator, Vec2, WorldState,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 0x0D21_BB1E;

/// Kickable-ball snapshots with `num_opponents` opponents within 15 m.
fn snapshots(num_opponents: usize, count: usize) -> Vec<WorldState> {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED + num_opponents as u64);
    (0..count)
        .map(|i| {
            let agent = Vec2::new(rng.gen_range(-40.0..40.0), rng.gen_range(-25.0..25.0));
            let body = AngleDeg::new(rng.gen_range(-180.0..180.0));
            let ball = agent + polar(rng.gen_range(0.4..1.0), AngleDeg::new(rng.gen_range(-180.0..180.0)));
            let mut wm = WorldState::new(
                GameTime::at(i as u64 + 1),
                AgentState::new(10, agent, Vec2::zeros(), body),
                BallState::new(ball, Vec2::zeros()),
            );
            for unum in 1..=num_opponents {
                let pos = agent + polar(rng.gen_range(2.0..15.0), AngleDeg::new(rng.gen_range(-180.0..180.0)));
                let mut o = OpponentState::new(unum as u8, pos, AngleDeg::new(rng.gen_range(-180.0..180.0)));
                o.pos_count = rng.gen_range(0..4);
                wm.opponents.push(o);
            }
            wm
        })
        .collect()
}

fn bench_generator<G: CourseGenerator>(c: &mut Criterion, generator: G) {
    let config = PlannerConfig::default();
    let mut group = c.benchmark_group(generator.name());

    for num_opponents in [0usize, 3, 8].iter() {
        let worlds = snapshots(*num_opponents, 16);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_opponents", num_opponents)),
            num_opponents,
            |b, _| {
                b.iter(|| {
                    for wm in &worlds {
                        black_box(generator.generate(black_box(wm), &config));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_keep(c: &mut Criterion) {
    bench_generator(c, KeepDribbleGenerator::new());
}

fn bench_short(c: &mut Criterion) {
    bench_generator(c, ShortDribbleGenerator::new());
}

fn bench_omni(c: &mut Criterion) {
    bench_generator(c, OmniDribbleGenerator::new());
}

fn bench_planner(c: &mut Criterion) {
    let worlds = snapshots(5, 16);
    c.bench_function("planner_plan", |b| {
        b.iter(|| {
            let mut planner = DribblePlanner::default();
            for wm in &worlds {
                black_box(planner.plan(black_box(wm)));
            }
        });
    });
}

criterion_group!(benches, bench_keep, bench_short, bench_omni, bench_planner);
criterion_main!(benches);
