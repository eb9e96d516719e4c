//! Attract-mode player
//!
//! Rewrites a tick's input from the current world: jump ahead of obstacles
//! that would hit a standing character, drift toward nearby coins, and
//! otherwise return to the start column. Deterministic, no RNG draws.

use super::powerup::PowerupKind;
use super::state::{GameMode, World};
use super::tick::TickInput;

/// Gap (pixels) to an obstacle's leading edge at which the jump fires
const JUMP_LEAD: f32 = 40.0;
/// How far ahead coins are worth chasing
const COIN_RANGE: f32 = 220.0;
/// Position tolerance before steering
const DEADZONE: f32 = 6.0;

/// Fill `input` with autopilot commands for this tick
pub fn steer(world: &World, input: &mut TickInput) {
    match world.mode {
        GameMode::Idle => {
            input.start = true;
            return;
        }
        GameMode::Playing => {}
        GameMode::Paused | GameMode::GameOver => return,
    }

    let character = &world.character;
    let left = character.pos.x;
    let right = left + character.width;
    let top = character.pos.y;
    let center = character.center();

    // Nearest obstacle still ahead that would hit us standing up
    let threat = world
        .obstacles
        .iter()
        .filter(|o| o.trailing_edge() > left)
        .filter(|o| o.pos.y + o.height > top + world.tuning.collision_margin)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    input.jump = match threat {
        Some(obstacle) if !world.is_invulnerable() => {
            let gap = obstacle.pos.x - right;
            (0.0..JUMP_LEAD).contains(&gap) && !character.is_jumping
        }
        _ => false,
    };

    let target = world
        .coins
        .iter()
        .filter(|c| !c.collected && c.pos.x > left && c.pos.x - left < COIN_RANGE)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
        .map(|c| c.pos);

    let home_x = world.tuning.canvas_width * world.tuning.start_x_fraction;
    let target_x = target.map_or(home_x, |pos| pos.x - character.width * 0.5);

    input.moving_left = target_x < left - DEADZONE;
    input.moving_right = target_x > left + DEADZONE;

    input.moving_up = false;
    input.moving_down = false;
    if world.is_effect_active(PowerupKind::Flight) {
        if let Some(pos) = target {
            input.moving_up = pos.y < center.y - DEADZONE;
            input.moving_down = pos.y > center.y + DEADZONE;
        }
    }
}
