//! Simulation core
//!
//! All gameplay logic lives here. This module stays free of platform code:
//! - Randomness only through the world's seeded RNG
//! - Time only through the `dt` passed to [`tick`]
//! - No rendering, storage or telemetry dependencies

pub mod ambience;
pub mod autopilot;
pub mod collision;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod view;

pub use ambience::{Ambience, Cloud, Particle, Scenery, SceneryKind};
pub use collision::Aabb;
pub use powerup::{ActiveEffect, PowerupKind};
pub use spawn::CoinPattern;
pub use state::{
    Character, Coin, GameEvent, GameMode, HUD_MESSAGE_Y, HudMessage, Obstacle, ObstacleKind,
    PowerupPickup, World,
};
pub use tick::{TickInput, multiplier_for_combo, resolve_obstacle_collisions, tick};
pub use view::{ActivePowerupView, RenderView};
