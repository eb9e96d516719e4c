//! Read model for the presentation layer
//!
//! Built between ticks from a shared borrow of the world, so a renderer can
//! never observe a half-applied tick or write back into the simulation.

use serde::Serialize;

use super::ambience::{Cloud, Particle, Scenery};
use super::powerup::PowerupKind;
use super::state::{Character, Coin, GameMode, HudMessage, Obstacle, PowerupPickup, World};

/// The running power-up as the HUD needs it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePowerupView {
    pub kind: PowerupKind,
    pub remaining_ms: f32,
    /// In [0, 1], drives the countdown bar
    pub remaining_fraction: f32,
    pub color: u32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView<'a> {
    pub mode: GameMode,
    pub score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
    pub score_multiplier: u64,
    pub combo_count: u32,
    /// Whether the HUD shows the combo badge
    pub show_combo: bool,
    pub difficulty_level: u32,
    pub day_night_phase: f32,
    pub game_speed: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub ground_y: f32,
    pub character: &'a Character,
    pub obstacles: &'a [Obstacle],
    pub coins: &'a [Coin],
    pub pickups: &'a [PowerupPickup],
    pub active_powerup: Option<ActivePowerupView>,
    pub hud_messages: &'a [HudMessage],
    pub particles: &'a [Particle],
    pub scenery: &'a [Scenery],
    pub clouds: &'a [Cloud],
}

impl<'a> RenderView<'a> {
    pub fn of(world: &'a World) -> Self {
        Self {
            mode: world.mode,
            score: world.score,
            high_score: world.high_score.max(world.score),
            new_high_score: world.new_high_score,
            score_multiplier: world.score_multiplier,
            combo_count: world.combo_count,
            show_combo: world.combo_count > 1,
            difficulty_level: world.difficulty_level,
            day_night_phase: world.day_night_phase,
            game_speed: world.game_speed,
            canvas_width: world.tuning.canvas_width,
            canvas_height: world.tuning.canvas_height,
            ground_y: world.tuning.ground_y(),
            character: &world.character,
            obstacles: &world.obstacles,
            coins: &world.coins,
            pickups: &world.pickups,
            active_powerup: world.active_effect.as_ref().map(|e| ActivePowerupView {
                kind: e.kind,
                remaining_ms: e.remaining_ms.max(0.0),
                remaining_fraction: e.remaining_fraction(),
                color: e.kind.color(),
            }),
            hud_messages: &world.hud_messages,
            particles: &world.ambience.particles,
            scenery: &world.ambience.scenery,
            clouds: &world.ambience.clouds,
        }
    }

    /// Serialize for a JavaScript renderer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
