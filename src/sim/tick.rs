//! Variable timestep simulation tick
//!
//! One call per animation frame. Commands are applied first, then the
//! world advances through a fixed sequence of steps; reordering them changes
//! how combo and power-up windows interact.

use rand::Rng;

use super::ambience::Bounds;
use super::autopilot;
use super::powerup::{self, PowerupKind};
use super::spawn;
use super::state::{GameEvent, GameMode, World};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start (or restart) a run
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    pub jump: bool,
    /// Held direction intents
    pub moving_left: bool,
    pub moving_right: bool,
    pub moving_up: bool,
    pub moving_down: bool,
    /// Attract mode - the autopilot plays the game
    pub autopilot: bool,
}

/// Score multiplier for a combo length
pub fn multiplier_for_combo(combo_count: u32) -> u64 {
    if combo_count >= 10 {
        3
    } else if combo_count >= 5 {
        2
    } else {
        1
    }
}

/// Advance the world by `dt` milliseconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    // Stalled or broken clock: nothing happens, commands included
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot::steer(world, &mut input);
    }

    if input.start {
        world.start_game();
    }
    if input.pause {
        world.toggle_pause();
    }
    if matches!(world.mode, GameMode::Playing | GameMode::Paused) {
        world.set_moving_left(input.moving_left);
        world.set_moving_right(input.moving_right);
        world.set_moving_up(input.moving_up);
        world.set_moving_down(input.moving_down);
    }
    if input.jump {
        world.jump();
    }

    if world.mode != GameMode::Paused {
        world.day_night_phase =
            (world.day_night_phase + world.tuning.day_night_speed * dt).rem_euclid(1.0);
    }

    if world.mode != GameMode::Playing {
        return;
    }

    world.elapsed_ms += dt;
    let frame_scale = dt / world.tuning.reference_frame_ms;

    update_horizontal(world, frame_scale);
    update_vertical(world, frame_scale);
    update_combo(world, dt);
    powerup::update_timer(world, dt);

    world.refresh_difficulty();
    world.refresh_game_speed();

    update_obstacles(world, dt);
    resolve_obstacle_collisions(world);
    if world.mode != GameMode::Playing {
        return;
    }

    update_coins(world, dt, frame_scale);
    update_pickups(world, dt);
    update_ambience(world, dt);
}

fn update_horizontal(world: &mut World, frame_scale: f32) {
    let tuning = &world.tuning;
    let mut move_speed = tuning.move_speed;
    if world.is_effect_active(PowerupKind::SuperDash) {
        move_speed *= tuning.super_dash_move_factor;
    }

    let character = &mut world.character;
    if character.moving_left {
        character.vel_x = -move_speed;
    } else if character.moving_right {
        character.vel_x = move_speed;
    } else {
        character.vel_x *= tuning.friction.powf(frame_scale);
        if character.vel_x.abs() < tuning.velocity_epsilon {
            character.vel_x = 0.0;
        }
    }

    character.pos.x = (character.pos.x + character.vel_x * frame_scale)
        .clamp(tuning.min_x, tuning.max_x());
}

fn update_vertical(world: &mut World, frame_scale: f32) {
    let flying = world.is_effect_active(PowerupKind::Flight);
    let elapsed = world.elapsed_ms;
    let reduced_motion = world.reduced_motion;
    let tuning = &world.tuning;
    let character = &mut world.character;
    let floor = character.floor_y(tuning);

    if flying {
        let step = tuning.flight_speed * frame_scale;
        if character.moving_up {
            character.pos.y -= step;
        } else if character.moving_down {
            character.pos.y += step;
        } else if !reduced_motion {
            character.pos.y += (elapsed * 0.005).sin() * tuning.hover_amplitude * frame_scale;
        }
        let ceiling = tuning.ground_y() - tuning.flight_ceiling;
        character.pos.y = character.pos.y.clamp(ceiling.min(floor), floor);
        return;
    }

    if character.is_jumping {
        character.pos.y -= character.jump_force * frame_scale;
        character.jump_force -= tuning.gravity * tuning.gravity_scale * frame_scale;

        if character.pos.y >= floor {
            character.pos.y = floor;
            character.is_jumping = false;
            character.jump_force = 0.0;
            character.air_jumps_used = 0;
        }
    } else {
        character.pos.y = floor;
    }
}

fn update_combo(world: &mut World, dt: f32) {
    if world.combo_timer_ms <= 0.0 {
        return;
    }
    world.combo_timer_ms -= dt;
    if world.combo_timer_ms <= 0.0 {
        log::debug!("Combo of {} lapsed", world.combo_count);
        world.combo_timer_ms = 0.0;
        world.combo_count = 0;
        world.score_multiplier = 1;
    }
}

fn update_obstacles(world: &mut World, dt: f32) {
    let frozen = world.is_effect_active(PowerupKind::TimeFreezer);

    if !frozen {
        world.obstacle_timer_ms += dt;
        if world.obstacle_timer_ms > world.tuning.obstacle_interval_ms {
            // At most one spawn per tick, keep the remainder
            world.obstacle_timer_ms %= world.tuning.obstacle_interval_ms;
            let obstacle = spawn::obstacle(&mut world.rng, &world.tuning);
            world.obstacles.push(obstacle);
        }
    }

    let rate = if frozen { world.tuning.freeze_factor } else { 1.0 };
    let dx = world.game_speed * dt * world.tuning.position_scale * rate;
    for obstacle in world.obstacles.iter_mut() {
        obstacle.pos.x -= dx;
    }
    world.obstacles.retain(|o| o.pos.x >= -o.width);

    let character_x = world.character.pos.x;
    for obstacle in world.obstacles.iter_mut() {
        if !obstacle.passed && character_x > obstacle.trailing_edge() {
            obstacle.passed = true;
            world.score += 1;
            world.events.push(GameEvent::ScoreUpdate { score: world.score });
        }
    }
}

/// End the run if the character hits an obstacle. No-op outside Playing,
/// while invulnerable, or while flying.
pub fn resolve_obstacle_collisions(world: &mut World) {
    if world.mode != GameMode::Playing
        || world.is_invulnerable()
        || world.is_effect_active(PowerupKind::Flight)
    {
        return;
    }

    let hitbox = world.character.bounds().inset(world.tuning.collision_margin);
    if world.obstacles.iter().any(|o| hitbox.overlaps(&o.bounds())) {
        world.trigger_game_over();
    }
}

fn update_coins(world: &mut World, dt: f32, frame_scale: f32) {
    let chance = if world.is_effect_active(PowerupKind::LuckyBreak) {
        world.tuning.lucky_coin_spawn_chance
    } else {
        world.tuning.coin_spawn_chance
    };
    if world.rng.random_bool(chance.clamp(0.0, 1.0)) {
        let batch = spawn::coin_pattern(&mut world.rng, &world.tuning);
        world.coins.extend(batch);
    }

    powerup::apply_magnet(world, frame_scale);

    let dx = world.game_speed * dt * world.tuning.position_scale;
    for coin in world.coins.iter_mut() {
        coin.pos.x -= dx;
    }
    world.coins.retain(|c| c.pos.x >= -c.size * 2.0);

    let hitbox = world.character.bounds();
    let mut hits = Vec::new();
    for coin in world.coins.iter_mut() {
        if !coin.collected && hitbox.overlaps(&coin.bounds()) {
            coin.collected = true;
            hits.push((coin.pos, coin.value, coin.is_special));
        }
    }
    world.coins.retain(|c| !c.collected);

    let doubler = if world.is_effect_active(PowerupKind::CoinDoubler) {
        world.tuning.coin_doubler_factor
    } else {
        1
    };

    for (pos, value, golden) in hits {
        world.score += value * world.score_multiplier * doubler;
        world.combo_count += 1;
        world.combo_timer_ms = world.tuning.combo_window_ms;
        world.score_multiplier = multiplier_for_combo(world.combo_count);

        let color = if golden { 0xFFD700 } else { 0xFFC107 };
        let life = 30.0 * world.tuning.reference_frame_ms;
        world.ambience.burst(&mut world.rng, pos, 10, color, life);

        if world.combo_count >= world.tuning.powerup_drop_min_combo
            && world
                .rng
                .random_bool(world.tuning.powerup_drop_chance.clamp(0.0, 1.0))
        {
            let pickup = spawn::powerup(&mut world.rng, &world.tuning, Some(pos));
            world.pickups.push(pickup);
        }
    }
}

fn update_pickups(world: &mut World, dt: f32) {
    let dx = world.game_speed * dt * world.tuning.position_scale;
    for pickup in world.pickups.iter_mut() {
        pickup.pos.x -= dx;
    }
    world.pickups.retain(|p| p.pos.x >= -p.size * 2.0);

    let hitbox = world.character.bounds();
    let mut collected = Vec::new();
    for pickup in world.pickups.iter_mut() {
        if !pickup.collected && hitbox.overlaps(&pickup.bounds()) {
            pickup.collected = true;
            collected.push((pickup.pos, pickup.kind));
        }
    }
    world.pickups.retain(|p| !p.collected);

    for (pos, kind) in collected {
        // Consumed either way; only an empty slot takes the effect
        powerup::activate(world, kind);
        let life = 40.0 * world.tuning.reference_frame_ms;
        world.ambience.burst(&mut world.rng, pos, 15, kind.color(), life);
    }
}

fn update_ambience(world: &mut World, dt: f32) {
    for message in world.hud_messages.iter_mut() {
        message.remaining_ms -= dt;
    }
    world.hud_messages.retain(|m| m.remaining_ms > 0.0);

    let bounds = Bounds {
        width: world.tuning.canvas_width,
        height: world.tuning.canvas_height,
        ground_y: world.tuning.ground_y(),
    };
    world.ambience.update(&mut world.rng, dt, bounds);
}
