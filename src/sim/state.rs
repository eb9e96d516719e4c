//! World state and core simulation types
//!
//! The [`World`] owns every entity collection exclusively. Factories hand
//! back fresh records, the tick moves them between states, and nothing
//! outside the world keeps references into it between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ambience::Ambience;
use super::collision::Aabb;
use super::powerup::{ActiveEffect, PowerupKind};
use crate::tuning::{Tuning, difficulty_for_score};

/// Current mode of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Start screen, nothing has been played yet
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Frozen mid-run, resumable
    Paused,
    /// Run ended; only a restart leaves this mode
    GameOver,
}

/// The player character (exactly one per world)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner
    pub pos: Vec2,
    pub vel_x: f32,
    /// Upward speed while airborne (negative means falling)
    pub jump_force: f32,
    pub is_jumping: bool,
    /// Extra jumps spent since leaving the ground
    pub air_jumps_used: u32,
    pub moving_left: bool,
    pub moving_right: bool,
    /// Only meaningful while flying
    pub moving_up: bool,
    pub moving_down: bool,
    pub width: f32,
    pub height: f32,
    /// Debug/cheat flag; unioned with effect-granted invulnerability
    pub invulnerable: bool,
}

impl Character {
    /// Character standing on the ground at its start position
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.canvas_width * tuning.start_x_fraction,
                tuning.ground_y() - tuning.character_height,
            ),
            vel_x: 0.0,
            jump_force: 0.0,
            is_jumping: false,
            air_jumps_used: 0,
            moving_left: false,
            moving_right: false,
            moving_up: false,
            moving_down: false,
            width: tuning.character_width,
            height: tuning.character_height,
            invulnerable: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_rect(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    /// Resting y for the current height
    pub fn floor_y(&self, tuning: &Tuning) -> f32 {
        tuning.ground_y() - self.height
    }

    pub fn clear_intents(&mut self) {
        self.moving_left = false;
        self.moving_right = false;
        self.moving_up = false;
        self.moving_down = false;
    }

    /// Kill all motion (game over)
    pub fn halt(&mut self) {
        self.vel_x = 0.0;
        self.jump_force = 0.0;
        self.is_jumping = false;
        self.clear_intents();
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Sits on the ground line
    Ground,
    /// Hovers in one of the flying bands
    Flying,
}

/// An obstacle entity, scrolling left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Set once when the character clears it
    pub passed: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_rect(self.pos, Vec2::new(self.width, self.height))
    }

    /// X of the trailing (right) edge
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.pos.x + self.width
    }
}

/// A coin entity; `pos` is the center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub size: f32,
    pub value: u64,
    /// Golden coin
    pub is_special: bool,
    pub collected: bool,
}

impl Coin {
    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.pos, Vec2::splat(self.size))
    }
}

/// A power-up waiting to be collected; `pos` is the center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerupPickup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub size: f32,
    pub collected: bool,
}

impl PowerupPickup {
    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.pos, Vec2::splat(self.size))
    }
}

/// Transient notification shown over the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudMessage {
    pub text: String,
    pub remaining_ms: f32,
    pub y: f32,
}

/// Vertical placement of power-up HUD messages
pub const HUD_MESSAGE_Y: f32 = 120.0;

/// Notifications produced by the simulation, drained by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    /// Score changed by passing an obstacle
    ScoreUpdate { score: u64 },
    GameOver { score: u64, new_high_score: bool },
    PowerupActivated { kind: PowerupKind },
    PowerupExpired { kind: PowerupKind },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Seed the RNG was created from (logged for reproduction)
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub mode: GameMode,
    /// Milliseconds played this run
    pub elapsed_ms: f32,
    pub score: u64,
    pub score_multiplier: u64,
    pub combo_count: u32,
    pub combo_timer_ms: f32,
    pub difficulty_level: u32,
    /// Time of day in [0, 1)
    pub day_night_phase: f32,
    /// Current scroll speed, power-up factors included
    pub game_speed: f32,
    /// Multiplier applied by speed-changing power-ups
    pub speed_factor: f32,
    pub obstacle_timer_ms: f32,
    pub character: Character,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub pickups: Vec<PowerupPickup>,
    /// The single effect slot
    pub active_effect: Option<ActiveEffect>,
    pub hud_messages: Vec<HudMessage>,
    /// Particles, scenery and clouds (cosmetic)
    pub ambience: Ambience,
    /// Best score known when the run started
    pub high_score: u64,
    pub new_high_score: bool,
    /// Disables the idle hover bob while flying
    pub reduced_motion: bool,
    /// Pending notifications for the session
    pub events: Vec<GameEvent>,
}

impl World {
    /// Create an idle world with an unseeded RNG
    pub fn new(tuning: Tuning) -> Self {
        Self::with_seed(tuning, rand::random())
    }

    /// Create an idle world with a reproducible RNG stream
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        let character = Character::spawn(&tuning);
        let game_speed = tuning.base_speed;
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Idle,
            elapsed_ms: 0.0,
            score: 0,
            score_multiplier: 1,
            combo_count: 0,
            combo_timer_ms: 0.0,
            difficulty_level: 1,
            day_night_phase: 0.0,
            game_speed,
            speed_factor: 1.0,
            obstacle_timer_ms: 0.0,
            character,
            obstacles: Vec::new(),
            coins: Vec::new(),
            pickups: Vec::new(),
            active_effect: None,
            hud_messages: Vec::new(),
            ambience: Ambience::default(),
            high_score: 0,
            new_high_score: false,
            reduced_motion: false,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run from any mode, discarding all run state
    pub fn start_game(&mut self) {
        log::info!(
            "Starting run (seed {}, previous mode {:?}, best {})",
            self.seed,
            self.mode,
            self.high_score
        );
        self.mode = GameMode::Playing;
        self.elapsed_ms = 0.0;
        self.score = 0;
        self.score_multiplier = 1;
        self.combo_count = 0;
        self.combo_timer_ms = 0.0;
        self.difficulty_level = 1;
        self.speed_factor = 1.0;
        self.game_speed = self.tuning.base_speed;
        self.obstacle_timer_ms = 0.0;
        self.character = Character::spawn(&self.tuning);
        self.obstacles.clear();
        self.coins.clear();
        self.pickups.clear();
        self.active_effect = None;
        self.hud_messages.clear();
        self.ambience.reset();
        self.new_high_score = false;
    }

    /// Playing <-> Paused; ignored in every other mode
    pub fn toggle_pause(&mut self) {
        self.mode = match self.mode {
            GameMode::Playing => GameMode::Paused,
            GameMode::Paused => GameMode::Playing,
            other => {
                log::debug!("Pause ignored in {:?}", other);
                return;
            }
        };
        log::info!("Game {}", if self.mode == GameMode::Paused { "paused" } else { "resumed" });
    }

    /// Start a jump if allowed. Returns true when a jump began.
    pub fn jump(&mut self) -> bool {
        if self.mode != GameMode::Playing || self.is_effect_active(PowerupKind::Flight) {
            return false;
        }

        if self.character.is_jumping {
            let extra_allowed = self.is_effect_active(PowerupKind::DoubleJump)
                && self.character.air_jumps_used == 0;
            if !extra_allowed {
                return false;
            }
            self.character.air_jumps_used += 1;
        }

        self.character.is_jumping = true;
        self.character.jump_force = self.tuning.jump_force;

        let feet = Vec2::new(
            self.character.pos.x + self.character.width * 0.5,
            self.character.pos.y + self.character.height,
        );
        self.ambience.burst(&mut self.rng, feet, 10, 0xBDBDBD, 20.0 * self.tuning.reference_frame_ms);
        self.events.push(GameEvent::Jump);
        true
    }

    /// End the run. Repeated calls while already over change nothing.
    pub fn trigger_game_over(&mut self) {
        if self.mode == GameMode::GameOver {
            return;
        }

        self.mode = GameMode::GameOver;
        self.character.halt();

        // Immediate clear, no expiry side effects
        if let Some(effect) = self.active_effect.take() {
            log::debug!("Dropping {:?} on game over", effect.kind);
        }
        self.speed_factor = 1.0;
        self.refresh_game_speed();

        self.new_high_score = self.score > self.high_score;
        if self.new_high_score {
            log::info!("New high score: {} (was {})", self.score, self.high_score);
            self.high_score = self.score;
        } else {
            log::info!("Game over! Score: {}, high score: {}", self.score, self.high_score);
        }

        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_high_score: self.new_high_score,
        });
    }

    pub fn set_moving_left(&mut self, moving: bool) {
        self.character.moving_left = moving;
    }

    pub fn set_moving_right(&mut self, moving: bool) {
        self.character.moving_right = moving;
    }

    pub fn set_moving_up(&mut self, moving: bool) {
        self.character.moving_up = moving;
    }

    pub fn set_moving_down(&mut self, moving: bool) {
        self.character.moving_down = moving;
    }

    /// Kind of the active effect, if any
    pub fn active_kind(&self) -> Option<PowerupKind> {
        self.active_effect.as_ref().map(|e| e.kind)
    }

    #[inline]
    pub fn is_effect_active(&self, kind: PowerupKind) -> bool {
        self.active_kind() == Some(kind)
    }

    /// Union of every source of obstacle immunity
    pub fn is_invulnerable(&self) -> bool {
        self.character.invulnerable
            || self
                .active_kind()
                .is_some_and(|kind| kind.grants_invulnerability())
    }

    /// Right movement boundary
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.tuning.max_x()
    }

    /// Recompute difficulty from the score
    pub fn refresh_difficulty(&mut self) {
        self.difficulty_level = difficulty_for_score(self.score);
    }

    /// Recompute scroll speed from the score and active speed factor
    pub fn refresh_game_speed(&mut self) {
        self.game_speed = self.tuning.speed_for_score(self.score) * self.speed_factor;
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
