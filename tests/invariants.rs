use proptest::prelude::*;

use nebula_dash::scene::{DrawKind, Scene};
use nebula_dash::sim::{GameState, TickInput, TickOutcome, tick};
use nebula_dash::Tuning;

/// Busier than the defaults so short runs see hits, pickups and ramps
fn busy_tuning() -> Tuning {
    Tuning {
        collectible_chance: 0.1,
        obstacle_base_interval: 40,
        obstacle_min_interval: 12,
        speed_threshold: 30,
        speed_increment: 0.3,
        ..Tuning::default()
    }
}

fn decode(bits: u8) -> TickInput {
    TickInput {
        up: bits & 1 != 0,
        down: bits & 2 != 0,
        left: bits & 4 != 0,
        right: bits & 8 != 0,
    }
}

/// Each script byte is held for eight ticks
fn run(seed: u64, script: &[u8], tuning: Tuning) -> (GameState, Scene, Vec<TickOutcome>) {
    let mut state = GameState::new(seed, tuning);
    let mut scene = Scene::new();
    let mut outcomes = Vec::new();
    for &bits in script {
        let input = decode(bits);
        for _ in 0..8 {
            outcomes.push(tick(&mut state, &input, &mut scene));
        }
    }
    (state, scene, outcomes)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn same_seed_same_session(seed in any::<u64>(), script in prop::collection::vec(0u8..16, 1..120)) {
        let (a, scene_a, out_a) = run(seed, &script, busy_tuning());
        let (b, scene_b, out_b) = run(seed, &script, busy_tuning());

        prop_assert_eq!(out_a, out_b);
        prop_assert_eq!(a.time_ticks, b.time_ticks);
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(&a.player, &b.player);
        prop_assert_eq!(&a.obstacles, &b.obstacles);
        prop_assert_eq!(&a.collectibles, &b.collectibles);
        prop_assert_eq!(a.report(), b.report());
        prop_assert_eq!(scene_a, scene_b);
    }

    #[test]
    fn invariants_hold_every_tick(seed in any::<u64>(), script in prop::collection::vec(0u8..16, 1..120)) {
        let tuning = busy_tuning();
        let field = glam::Vec2::new(tuning.field_width, tuning.field_height);
        let mut state = GameState::new(seed, tuning.clone());
        let mut scene = Scene::new();
        let mut last_score = 0;
        let mut last_speed = tuning.base_speed;

        for &bits in &script {
            let input = decode(bits);
            for _ in 0..8 {
                let outcome = tick(&mut state, &input, &mut scene);

                prop_assert!(state.player.lives <= tuning.start_lives);
                prop_assert!(state.player.energy <= tuning.max_energy);
                prop_assert!(state.game_speed <= tuning.max_speed);
                prop_assert!(state.game_speed >= last_speed);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.player.invulnerable == (state.player.invulnerability_ticks > 0));
                prop_assert!(state.player.combo == 0 || state.player.combo_ticks > 0);

                let player = &state.player.body;
                prop_assert!(player.pos.x >= 0.0 && player.pos.y >= 0.0);
                prop_assert!(player.pos.x + player.size.x <= field.x);
                prop_assert!(player.pos.y + player.size.y <= field.y);

                prop_assert!(state.obstacles.iter().all(|o| o.body.active));
                prop_assert!(state.collectibles.iter().all(|c| c.body.active));
                prop_assert!(state.particles.particles().iter().all(|p| p.life > 0.0));

                prop_assert_eq!(scene.count(DrawKind::Player), 1);
                prop_assert_eq!(scene.count(DrawKind::Obstacle), state.obstacles.len());
                prop_assert_eq!(scene.count(DrawKind::Particle), state.particles.len());

                prop_assert_eq!(outcome == TickOutcome::GameOver, state.player.lives == 0);
                last_score = state.score;
                last_speed = state.game_speed;
            }
        }
    }

    #[test]
    fn entity_ids_are_unique(seed in any::<u64>()) {
        let mut state = GameState::new(seed, busy_tuning());
        let mut scene = Scene::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..900 {
            if tick(&mut state, &TickInput::default(), &mut scene) == TickOutcome::GameOver {
                break;
            }
            for id in state
                .obstacles
                .iter()
                .map(|o| o.body.id)
                .chain(state.collectibles.iter().map(|c| c.body.id))
            {
                seen.insert(id);
            }
        }
        let mut ids: Vec<u32> = state
            .obstacles
            .iter()
            .map(|o| o.body.id)
            .chain(state.collectibles.iter().map(|c| c.body.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
        prop_assert!(!seen.contains(&state.player.body.id));
    }
}
