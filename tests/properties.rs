//! Property tests for the simulation invariants

use cat_runner::sim::powerup;
use cat_runner::sim::{
    Coin, GameMode, Obstacle, ObstacleKind, PowerupKind, PowerupPickup, TickInput, World,
    multiplier_for_combo, resolve_obstacle_collisions, tick,
};
use cat_runner::tuning::Tuning;
use proptest::prelude::*;

fn playing(seed: u64) -> World {
    let mut world = World::with_seed(Tuning::default(), seed);
    world.tuning.powerup_drop_chance = 0.0;
    world.start_game();
    world.character.invulnerable = true;
    world
}

fn any_kind() -> impl Strategy<Value = PowerupKind> {
    (0..PowerupKind::ALL.len()).prop_map(|i| PowerupKind::ALL[i])
}

fn coin_on(world: &World) -> Coin {
    Coin {
        pos: world.character.center(),
        size: 15.0,
        value: 1,
        is_special: false,
        collected: false,
    }
}

proptest! {
    #[test]
    fn x_stays_within_bounds(
        seed in any::<u64>(),
        start_x in 10.0f32..750.0,
        steps in prop::collection::vec((any::<bool>(), any::<bool>(), 0.1f32..500.0), 1..60),
        dash in any::<bool>(),
    ) {
        let mut world = playing(seed);
        world.character.pos.x = start_x;
        if dash {
            powerup::activate(&mut world, PowerupKind::SuperDash);
        }
        let (min_x, max_x) = (world.tuning.min_x, world.max_x());

        for (left, right, dt) in steps {
            let input = TickInput {
                moving_left: left,
                moving_right: right,
                ..Default::default()
            };
            tick(&mut world, &input, dt);
            prop_assert!(world.character.pos.x >= min_x && world.character.pos.x <= max_x);
        }
    }

    #[test]
    fn multiplier_follows_combo_then_resets(
        seed in any::<u64>(),
        gaps in prop::collection::vec(1.0f32..40.0, 1..25),
    ) {
        let mut world = playing(seed);
        world.tuning.coin_spawn_chance = 0.0;
        let mut last_multiplier = 1;

        for dt in gaps {
            let coin = coin_on(&world);
            world.coins.push(coin);
            tick(&mut world, &TickInput::default(), dt);
            prop_assert_eq!(world.score_multiplier, multiplier_for_combo(world.combo_count));
            prop_assert!(world.score_multiplier >= last_multiplier);
            last_multiplier = world.score_multiplier;
        }

        let window = world.tuning.combo_window_ms;
        tick(&mut world, &TickInput::default(), window);
        prop_assert_eq!(world.combo_count, 0);
        prop_assert_eq!(world.score_multiplier, 1);
    }

    #[test]
    fn one_effect_at_a_time(
        seed in any::<u64>(),
        first in any_kind(),
        later in prop::collection::vec((any_kind(), 1.0f32..20.0), 1..20),
    ) {
        let mut world = playing(seed);
        world.tuning.coin_spawn_chance = 0.0;
        prop_assert!(powerup::activate(&mut world, first));

        for (kind, dt) in later {
            let before = world.active_effect.clone().unwrap();
            world.pickups.push(PowerupPickup {
                pos: world.character.center(),
                kind,
                size: 25.0,
                collected: false,
            });
            tick(&mut world, &TickInput::default(), dt);

            let after = world.active_effect.clone().unwrap();
            prop_assert_eq!(after.kind, first);
            prop_assert_eq!(after.remaining_ms, before.remaining_ms - dt);
            prop_assert!(world.pickups.iter().all(|p| !p.collected));
        }
    }

    #[test]
    fn minisize_restores_bits(
        width in 1.0f32..120.0,
        height in 1.0f32..120.0,
        airborne in any::<bool>(),
    ) {
        let mut world = playing(1);
        world.character.width = width;
        world.character.height = height;
        world.character.is_jumping = airborne;

        powerup::activate(&mut world, PowerupKind::Minisize);
        let duration = world.tuning.powerup_duration_ms;
        powerup::update_timer(&mut world, duration);

        prop_assert!(world.active_effect.is_none());
        prop_assert_eq!(world.character.width.to_bits(), width.to_bits());
        prop_assert_eq!(world.character.height.to_bits(), height.to_bits());
    }

    #[test]
    fn game_over_is_absorbing(score in 0u64..10_000, repeats in 2usize..10) {
        let mut world = World::with_seed(Tuning::default(), 5);
        world.start_game();
        world.score = score;
        let c = world.character.pos;
        world.obstacles.push(Obstacle {
            pos: c,
            width: 30.0,
            height: 40.0,
            kind: ObstacleKind::Ground,
            passed: false,
        });
        world.trigger_game_over();
        let _ = world.take_events();

        for _ in 0..repeats {
            resolve_obstacle_collisions(&mut world);
            world.trigger_game_over();
            tick(&mut world, &TickInput { jump: true, pause: true, ..Default::default() }, 16.0);
        }
        prop_assert_eq!(world.mode, GameMode::GameOver);
        prop_assert_eq!(world.score, score);
        prop_assert!(world.take_events().is_empty());
        prop_assert_eq!(world.character.pos, c);
    }
}
