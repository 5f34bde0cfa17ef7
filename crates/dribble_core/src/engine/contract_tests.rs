//! Planner Contract Tests
//!
//! End-to-end guarantees across modules:
//! 1. Step accounting of generated plans
//! 2. Pruning bound (one candidate per safety level)
//! 3. Classifier monotonicity in reach cycles
//! 4. Memoized generation is bit-identical within a cycle
//! 5. Stepper agrees with the closed-form ball series
//! 6. Reference snapshots (open approach, close marker, excess kick, skipped cycle)

#[cfg(test)]
mod tests {
    use crate::engine::action::{ActionKind, SafetyLevel, StepCounts};
    use crate::engine::commitment::{AbortReason, Commitment, ExecutionOutcome};
    use crate::engine::config::PlannerConfig;
    use crate::engine::generator::{
        evaluate_branch, CourseGenerator, DribbleContext, GeneratorOutput, KeepDribbleGenerator, Memoized,
        OmniDribbleGenerator, RejectReason, RejectStats, ShortDribbleGenerator,
    };
    use crate::engine::kinematics::{ball_future_pos, ball_step, check_kick, BallStep, CachePlan};
    use crate::engine::planner::DribblePlanner;
    use crate::engine::safety::{level_for, SafetyClassifier};
    use crate::engine::types::{polar, AngleDeg, Pitch, Vec2};
    use crate::engine::world::{AgentState, BallState, GameTime, OpponentState, WorldState};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn sha256_hex(bytes: &[u8]) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            out.push_str(&format!("{:02x}", b));
        }
        out
    }

    fn fingerprint(output: &GeneratorOutput) -> String {
        let json = serde_json::to_string(output).expect("output json");
        sha256_hex(json.as_bytes())
    }

    /// Agent at the origin facing +x with a stationary ball at (0.3, 0).
    fn approach_world(opponent: Option<OpponentState>) -> WorldState {
        let mut wm = WorldState::new(
            GameTime::at(200),
            AgentState::new(10, Vec2::zeros(), Vec2::zeros(), AngleDeg::ZERO),
            BallState::new(Vec2::new(0.3, 0.0), Vec2::zeros()),
        );
        if let Some(o) = opponent {
            wm.opponents.push(o);
        }
        wm
    }

    fn all_outputs(world: &WorldState, config: &PlannerConfig) -> Vec<GeneratorOutput> {
        vec![
            KeepDribbleGenerator.generate(world, config),
            ShortDribbleGenerator.generate(world, config),
            OmniDribbleGenerator.generate(world, config),
        ]
    }

    prop_compose! {
        fn arb_world()(
            ax in -40.0f64..40.0,
            ay in -25.0f64..25.0,
            body in -180.0f64..180.0,
            ball_dist in 0.4f64..1.0,
            ball_dir in -180.0f64..180.0,
            opponents in prop::collection::vec((2.0f64..15.0, -180.0f64..180.0, -180.0f64..180.0, 0u32..4), 0..4),
        ) -> WorldState {
            let agent_pos = Vec2::new(ax, ay);
            let mut wm = WorldState::new(
                GameTime::at(500),
                AgentState::new(7, agent_pos, Vec2::zeros(), AngleDeg::new(body)),
                BallState::new(agent_pos + polar(ball_dist, AngleDeg::new(ball_dir)), Vec2::zeros()),
            );
            for (i, (dist, dir, facing, pos_count)) in opponents.into_iter().enumerate() {
                let mut o = OpponentState::new(i as u8 + 1, agent_pos + polar(dist, AngleDeg::new(dir)), AngleDeg::new(facing));
                o.pos_count = pos_count;
                wm.opponents.push(o);
            }
            wm
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Every generated plan's counters add up to its duration.
        #[test]
        fn prop_step_counts_sum_to_duration(world in arb_world()) {
            let config = PlannerConfig::default();
            for output in all_outputs(&world, &config) {
                for c in &output.candidates {
                    let s = c.action.steps;
                    prop_assert_eq!(s.kick + s.turn + s.dash, c.action.duration_time());
                    prop_assert!(s.total() > 0);
                }
            }
        }

        /// After pruning at most one candidate per safety level survives.
        #[test]
        fn prop_pruning_keeps_one_per_level(world in arb_world()) {
            let config = PlannerConfig::default();
            for output in all_outputs(&world, &config) {
                prop_assert!(output.candidates.len() <= 4);
                let levels: HashSet<SafetyLevel> = output.candidates.iter().map(|c| c.safety()).collect();
                prop_assert_eq!(levels.len(), output.candidates.len());
                match output.best {
                    Some(i) => prop_assert!(i < output.candidates.len()),
                    None => prop_assert!(output.candidates.is_empty()),
                }
            }
        }

        /// Kicks of surviving plans are producible without clamping.
        #[test]
        fn prop_kicks_are_within_limits(world in arb_world()) {
            let config = PlannerConfig::default();
            if let Some(ctx) = DribbleContext::new(&world, &config) {
                for output in all_outputs(&world, &config) {
                    for c in &output.candidates {
                        if let ActionKind::Dribble { first_ball_vel, .. } = c.action.kind {
                            if c.action.steps.kick > 0 {
                                prop_assert!(check_kick(&first_ball_vel, &ctx.ball.vel, ctx.kick_rate, &config.server).is_ok());
                            }
                        }
                    }
                }
            }
        }

        /// More reach cycles never lower the level.
        #[test]
        fn prop_level_monotonic_in_reach(
            a in -5i32..40,
            s in 0i32..12,
            in_box in any::<bool>(),
            goalie in any::<bool>(),
        ) {
            let th = PlannerConfig::default().safety;
            prop_assert!(level_for(a, s, in_box, goalie, &th) <= level_for(a + 1, s, in_box, goalie, &th));
        }

        /// Pushing an opponent further from the ball never lowers the level.
        #[test]
        fn prop_classifier_monotonic_in_distance(
            dist in 1.2f64..14.0,
            extra in 0.0f64..5.0,
            dir in -180.0f64..180.0,
            step in 1u32..8,
        ) {
            let config = PlannerConfig::deterministic();
            let ball = Vec2::new(0.5, 0.0);
            let place = |d: f64| {
                let pos = ball + polar(d, AngleDeg::new(dir));
                // facing the ball: no turn needed at either distance
                OpponentState::new(3, pos, AngleDeg::new(dir + 180.0))
            };
            let near = approach_world(Some(place(dist)));
            let far = approach_world(Some(place(dist + extra)));
            let near_level = SafetyClassifier::new(&near, &config).classify(&ball, step);
            let far_level = SafetyClassifier::new(&far, &config).classify(&ball, step);
            prop_assert!(near_level <= far_level);
        }

        /// Stepping the ball cycle by cycle matches the geometric extrapolation.
        #[test]
        fn prop_stepper_matches_geometric_series(
            x in -50.0f64..50.0,
            y in -30.0f64..30.0,
            speed in 0.0f64..3.0,
            dir in -180.0f64..180.0,
            n in 0u32..30,
        ) {
            let decay = PlannerConfig::default().server.ball_decay;
            let vel = polar(speed, AngleDeg::new(dir));
            let mut ball = BallStep { pos: Vec2::new(x, y), vel };
            for _ in 0..n {
                ball = ball_step(&ball, decay);
            }
            let closed = ball_future_pos(&Vec2::new(x, y), &vel, n, decay);
            prop_assert!((ball.pos - closed).norm() < 1e-9);
        }
    }

    #[test]
    fn test_memoized_generation_is_bit_identical() {
        let config = PlannerConfig::default();
        let wm = approach_world(Some(OpponentState::new(4, Vec2::new(9.0, 2.0), AngleDeg::new(180.0))));

        let mut memo = Memoized::new(ShortDribbleGenerator);
        let first = fingerprint(memo.generate(&wm, &config));
        let second = fingerprint(memo.generate(&wm, &config));
        assert_eq!(first, second);
        assert_eq!(memo.hits(), 1);

        // an uncached run on the same snapshot is deterministic as well
        assert_eq!(first, fingerprint(&ShortDribbleGenerator.generate(&wm, &config)));
    }

    #[test]
    fn test_distant_opponent_facing_ball() {
        let opponent = OpponentState::new(2, Vec2::new(5.0, 0.0), AngleDeg::new(180.0));
        let wm = approach_world(Some(opponent));
        let ball = wm.ball.pos;
        let path = [ball, ball, ball];

        // reach 4 cycles vs steps 1..=3: Dangerous under the default margins,
        // Safe only when both margins are 0
        let mut config = PlannerConfig::deterministic();
        let classifier = SafetyClassifier::new(&wm, &config);
        let level = classifier.classify_path(&path, 1);
        assert!(level > SafetyLevel::Failure);
        assert_eq!(level, SafetyLevel::Dangerous);
        assert_eq!(classifier.classify_detailed(&ball, 3).decisive.map(|e| e.cycles()), Some(4));

        config.safety.dangerous_margin = 0;
        config.safety.maybe_dangerous_margin = 0;
        let strict = SafetyClassifier::new(&wm, &config);
        assert_eq!(strict.classify_path(&path, 1), SafetyLevel::Safe);
    }

    #[test]
    fn test_close_opponent_is_never_safe() {
        let opponent = OpponentState::new(2, Vec2::new(1.5, 0.0), AngleDeg::new(180.0));
        let wm = approach_world(Some(opponent));
        let ball = wm.ball.pos;
        let path = [ball, ball, ball];

        let mut config = PlannerConfig::deterministic();
        assert!(SafetyClassifier::new(&wm, &config).classify_path(&path, 1) < SafetyLevel::Safe);
        config.safety.dangerous_margin = 0;
        config.safety.maybe_dangerous_margin = 0;
        assert!(SafetyClassifier::new(&wm, &config).classify_path(&path, 1) < SafetyLevel::Safe);

        // no generated forward dribble is Safe either
        for output in all_outputs(&wm, &config) {
            for c in &output.candidates {
                if c.action.target_ball_pos.x > 0.3 && c.action.target_ball_pos.y.abs() < 0.5 {
                    assert!(c.safety() < SafetyLevel::Safe, "{}", c.action);
                }
            }
        }
    }

    #[test]
    fn test_goal_line_bounds_every_generator() {
        let config = PlannerConfig::default();
        let pitch = Pitch::from_server(&config.server);
        let margin = config.feasibility.field_margin_m;
        let wm = WorldState::new(
            GameTime::at(300),
            AgentState::new(9, Vec2::new(50.0, 0.0), Vec2::zeros(), AngleDeg::ZERO),
            BallState::new(Vec2::new(50.5, 0.0), Vec2::zeros()),
        );
        for output in all_outputs(&wm, &config) {
            assert!(output.stats.ball_out_of_field > 0);
            for c in &output.candidates {
                assert!(pitch.contains(&c.action.target_ball_pos, margin), "{}", c.action);
            }
        }
    }

    #[test]
    fn test_excess_kick_discards_branch() {
        let config = PlannerConfig::default();
        let wm = approach_world(None);
        let ctx = DribbleContext::new(&wm, &config).expect("ball kickable");
        let cache = ctx.simulate_agent(CachePlan {
            n_kick: 1,
            target_body: AngleDeg::ZERO,
            n_turn: 0,
            dash_dir: AngleDeg::ZERO,
            n_dash: 3,
            dash_power: 100.0,
        });
        let mut stats = RejectStats::default();
        let demanded = Vec2::new(config.server.ball_accel_max + 0.2, 0.0);
        assert!(evaluate_branch(&ctx, &cache, 3, Some(demanded), &mut stats).is_none());
        assert_eq!(stats.count(RejectReason::KickAccel) + stats.count(RejectReason::KickPower), 1);
    }

    #[test]
    fn test_ranked_plans_survive_adoption_cycle() {
        let config = PlannerConfig::default();
        let mut tackler = OpponentState::new(4, Vec2::new(3.0, 1.3), AngleDeg::new(180.0));
        tackler.tackle_cycles = 10;
        let marker = OpponentState::new(6, Vec2::new(-4.0, -3.0), AngleDeg::new(45.0));

        let mut worlds = vec![approach_world(Some(tackler.clone())), approach_world(Some(marker))];
        worlds.push(approach_world(Some(tackler)).with_opponent(OpponentState::new(
            8,
            Vec2::new(6.0, -2.0),
            AngleDeg::new(150.0),
        )));

        for mut wm in worlds {
            wm.ball.pos = Vec2::new(0.5, 0.0);
            let mut planner = DribblePlanner::new(config.clone());
            let plans = planner.plan(&wm);
            assert!(!plans.is_empty());
            for plan in plans {
                let label = plan.to_string();
                let mut commitment = Commitment::new();
                assert!(commitment.adopt(plan, wm.time));
                match commitment.step(&wm, &config) {
                    ExecutionOutcome::Command(_) => {}
                    other => panic!("{} on adoption cycle: {:?}", label, other),
                }
            }
        }
    }

    #[test]
    fn test_skipped_cycle_aborts_planned_dribble() {
        let config = PlannerConfig::default();
        let mut wm = approach_world(None);
        wm.ball.pos = Vec2::new(0.5, 0.0);
        let mut planner = DribblePlanner::new(config.clone());
        let plan = planner.best(&wm).expect("open field has a plan");
        assert!(plan.steps.total() >= 2);

        let mut commitment = Commitment::new();
        assert!(commitment.adopt(plan, wm.time));
        assert!(matches!(commitment.step(&wm, &config), ExecutionOutcome::Command(_)));

        let mut later = wm.clone();
        later.time = GameTime::at(wm.time.cycle + 2);
        let outcome = commitment.step(&later, &config);
        assert_eq!(
            outcome,
            ExecutionOutcome::Aborted(AbortReason::MissedCycle {
                expected: wm.time.cycle + 1,
                actual: wm.time.cycle + 2,
            })
        );
        assert_eq!(commitment.remaining(), 0);
    }

    #[test]
    fn test_skipped_cycle_aborts_two_dash_plan() {
        let config = PlannerConfig::default();
        let wm = approach_world(None);
        let plan = crate::engine::action::CooperativeAction::dribble(
            10,
            Vec2::new(1.6, 0.0),
            Vec2::new(1.0, 0.0),
            AngleDeg::ZERO,
            Vec2::zeros(),
            0.0,
            100.0,
            AngleDeg::ZERO,
            StepCounts::new(0, 0, 2),
        )
        .with_safety(SafetyLevel::Safe);

        let mut commitment = Commitment::new();
        commitment.adopt(plan, wm.time);
        assert!(matches!(commitment.step(&wm, &config), ExecutionOutcome::Command(_)));
        let mut skipped = wm.clone();
        skipped.time = GameTime::at(wm.time.cycle + 2);
        assert!(matches!(
            commitment.step(&skipped, &config),
            ExecutionOutcome::Aborted(AbortReason::MissedCycle { .. })
        ));
    }
}
