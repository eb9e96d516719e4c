//! Power-up catalog and the single effect slot
//!
//! States: empty slot -> `Some(ActiveEffect)` -> empty slot. A pickup only
//! fills an empty slot; collecting one while an effect runs consumes the
//! pickup and changes nothing. The slot empties when the timer runs out
//! (with the kind's expiry mutation) or on game over (without it).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spawn;
use super::state::{GameEvent, HUD_MESSAGE_Y, HudMessage, World};

/// Every power-up the factory can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerupKind {
    Speed,
    Magnet,
    DoubleJump,
    Shield,
    Slowmo,
    Minisize,
    CoinDoubler,
    TimeFreezer,
    SuperDash,
    Flight,
    GhostMode,
    LuckyBreak,
    Invisible,
}

impl PowerupKind {
    /// The closed catalog, in factory draw order
    pub const ALL: [PowerupKind; 13] = [
        PowerupKind::Speed,
        PowerupKind::Magnet,
        PowerupKind::DoubleJump,
        PowerupKind::Shield,
        PowerupKind::Slowmo,
        PowerupKind::Minisize,
        PowerupKind::CoinDoubler,
        PowerupKind::TimeFreezer,
        PowerupKind::SuperDash,
        PowerupKind::Flight,
        PowerupKind::GhostMode,
        PowerupKind::LuckyBreak,
        PowerupKind::Invisible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Speed => "speed",
            PowerupKind::Magnet => "magnet",
            PowerupKind::DoubleJump => "doubleJump",
            PowerupKind::Shield => "shield",
            PowerupKind::Slowmo => "slowmo",
            PowerupKind::Minisize => "minisize",
            PowerupKind::CoinDoubler => "coinDoubler",
            PowerupKind::TimeFreezer => "timeFreezer",
            PowerupKind::SuperDash => "superDash",
            PowerupKind::Flight => "flight",
            PowerupKind::GhostMode => "ghostMode",
            PowerupKind::LuckyBreak => "luckyBreak",
            PowerupKind::Invisible => "invisible",
        }
    }

    /// HUD tooltip shown while the effect runs
    pub fn description(&self) -> &'static str {
        match self {
            PowerupKind::Speed => "Speed Boost: Move faster!",
            PowerupKind::Magnet => "Coin Magnet: Attract nearby coins!",
            PowerupKind::DoubleJump => "Double Jump: Jump again in mid-air!",
            PowerupKind::Shield => "Shield: Obstacles can't hurt you!",
            PowerupKind::Slowmo => "Slow Motion: The world slows down!",
            PowerupKind::Minisize => "Mini Size: Squeeze through gaps!",
            PowerupKind::CoinDoubler => "Coin Doubler: Coins are worth double!",
            PowerupKind::TimeFreezer => "Time Freeze: Obstacles stand still!",
            PowerupKind::SuperDash => "Super Dash: Dash through anything!",
            PowerupKind::Flight => "Flight: Use up/down to fly!",
            PowerupKind::GhostMode => "Ghost Mode: Pass through obstacles!",
            PowerupKind::LuckyBreak => "Lucky Break: Coins everywhere!",
            PowerupKind::Invisible => "Invisible: Nothing can see you!",
        }
    }

    /// Pickup/particle color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            PowerupKind::Speed => 0xFF5722,
            PowerupKind::Magnet => 0x673AB7,
            PowerupKind::DoubleJump => 0x4CAF50,
            PowerupKind::Shield => 0x2196F3,
            PowerupKind::Slowmo => 0x9C27B0,
            PowerupKind::Minisize => 0xE91E63,
            PowerupKind::CoinDoubler => 0xFFC107,
            PowerupKind::TimeFreezer => 0x03A9F4,
            PowerupKind::SuperDash => 0xFF9800,
            PowerupKind::Flight => 0x81D4FA,
            PowerupKind::GhostMode => 0xB0BEC5,
            PowerupKind::LuckyBreak => 0x8BC34A,
            PowerupKind::Invisible => 0xECEFF1,
        }
    }

    /// Whether this effect makes obstacles harmless
    pub fn grants_invulnerability(&self) -> bool {
        matches!(
            self,
            PowerupKind::Shield
                | PowerupKind::GhostMode
                | PowerupKind::Invisible
                | PowerupKind::SuperDash
        )
    }
}

/// The running effect in the slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerupKind,
    pub remaining_ms: f32,
    pub duration_ms: f32,
    /// Character size captured before Minisize, restored verbatim on expiry
    pub saved_size: Option<Vec2>,
}

impl ActiveEffect {
    pub fn new(kind: PowerupKind, duration_ms: f32) -> Self {
        Self {
            kind,
            remaining_ms: duration_ms,
            duration_ms,
            saved_size: None,
        }
    }

    /// Remaining time as a fraction of the full duration, in [0, 1]
    pub fn remaining_fraction(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        (self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Fill the effect slot with `kind`. Returns false (and changes nothing)
/// when an effect is already running.
pub fn activate(world: &mut World, kind: PowerupKind) -> bool {
    if let Some(active) = &world.active_effect {
        log::debug!("Cannot activate {}: {} is still active", kind.as_str(), active.kind.as_str());
        return false;
    }

    let duration = world.tuning.powerup_duration_ms;
    let mut effect = ActiveEffect::new(kind, duration);

    world.hud_messages.clear();
    world.hud_messages.push(HudMessage {
        text: kind.description().to_string(),
        remaining_ms: duration,
        y: HUD_MESSAGE_Y,
    });

    match kind {
        PowerupKind::Speed => world.speed_factor = world.tuning.speed_boost_factor,
        PowerupKind::Slowmo => world.speed_factor = world.tuning.slowmo_factor,
        PowerupKind::Minisize => {
            let character = &mut world.character;
            let grounded = !character.is_jumping;
            effect.saved_size = Some(Vec2::new(character.width, character.height));
            character.width *= world.tuning.minisize_factor;
            character.height *= world.tuning.minisize_factor;
            if grounded {
                character.pos.y = character.floor_y(&world.tuning);
            }
        }
        PowerupKind::Flight => {
            world.character.is_jumping = false;
            world.character.jump_force = 0.0;
            world.character.air_jumps_used = 0;
        }
        PowerupKind::LuckyBreak => {
            let ahead = world.character.pos.x + world.character.width + 60.0;
            let y = world.character.center().y;
            for i in 0..world.tuning.lucky_bonus_patterns {
                let x = ahead + i as f32 * 180.0;
                world.coins.extend(spawn::coin_line(x, y));
            }
        }
        PowerupKind::Magnet
        | PowerupKind::DoubleJump
        | PowerupKind::Shield
        | PowerupKind::CoinDoubler
        | PowerupKind::TimeFreezer
        | PowerupKind::SuperDash
        | PowerupKind::GhostMode
        | PowerupKind::Invisible => {}
    }

    world.active_effect = Some(effect);
    world.refresh_game_speed();
    world.events.push(GameEvent::PowerupActivated { kind });
    log::info!("Activated power-up: {}", kind.as_str());
    true
}

/// Empty the slot, applying the kind's expiry mutation
pub fn expire(world: &mut World) {
    let Some(effect) = world.active_effect.take() else {
        return;
    };

    match effect.kind {
        PowerupKind::Speed | PowerupKind::Slowmo => world.speed_factor = 1.0,
        PowerupKind::Minisize => {
            if let Some(size) = effect.saved_size {
                let character = &mut world.character;
                let grounded = !character.is_jumping;
                character.width = size.x;
                character.height = size.y;
                if grounded {
                    character.pos.y = character.floor_y(&world.tuning);
                }
            }
        }
        PowerupKind::Flight => {
            // Fall back down instead of snapping to the ground
            let character = &mut world.character;
            if character.pos.y < character.floor_y(&world.tuning) {
                character.is_jumping = true;
                character.jump_force = -world.tuning.flight_drop_impulse;
            }
        }
        PowerupKind::Magnet
        | PowerupKind::DoubleJump
        | PowerupKind::Shield
        | PowerupKind::CoinDoubler
        | PowerupKind::TimeFreezer
        | PowerupKind::SuperDash
        | PowerupKind::GhostMode
        | PowerupKind::LuckyBreak
        | PowerupKind::Invisible => {}
    }

    world.refresh_game_speed();
    world.events.push(GameEvent::PowerupExpired { kind: effect.kind });
    log::info!("Power-up expired: {}", effect.kind.as_str());
}

/// Count the slot down; expire when it reaches zero
pub fn update_timer(world: &mut World, dt: f32) {
    let Some(effect) = world.active_effect.as_mut() else {
        return;
    };
    effect.remaining_ms -= dt;
    if effect.remaining_ms <= 0.0 {
        expire(world);
    }
}

/// Per-tick magnet pull: uncollected coins within range drift toward the
/// character center
pub fn apply_magnet(world: &mut World, frame_scale: f32) {
    if !world.is_effect_active(PowerupKind::Magnet) {
        return;
    }
    let center = world.character.center();
    let radius = world.tuning.magnet_radius;
    let pull = (world.tuning.magnet_pull * frame_scale).min(1.0);
    for coin in world.coins.iter_mut().filter(|c| !c.collected) {
        let to_character = center - coin.pos;
        if to_character.length() <= radius {
            coin.pos += to_character * pull;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Coin, GameMode};
    use crate::tuning::Tuning;

    fn playing_world() -> World {
        let mut world = World::with_seed(Tuning::default(), 3);
        world.start_game();
        world
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = PowerupKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PowerupKind::ALL.len());
    }

    #[test]
    fn test_invulnerability_kinds() {
        let granted: Vec<_> = PowerupKind::ALL
            .iter()
            .filter(|k| k.grants_invulnerability())
            .collect();
        assert_eq!(
            granted,
            vec![
                &PowerupKind::Shield,
                &PowerupKind::SuperDash,
                &PowerupKind::GhostMode,
                &PowerupKind::Invisible
            ]
        );
    }

    #[test]
    fn test_second_activation_is_ignored() {
        let mut world = playing_world();
        assert!(activate(&mut world, PowerupKind::Magnet));
        world.active_effect.as_mut().unwrap().remaining_ms = 4321.0;

        assert!(!activate(&mut world, PowerupKind::Speed));
        let effect = world.active_effect.as_ref().unwrap();
        assert_eq!(effect.kind, PowerupKind::Magnet);
        assert_eq!(effect.remaining_ms, 4321.0);
        assert_eq!(world.speed_factor, 1.0);
    }

    #[test]
    fn test_activation_replaces_hud_messages() {
        let mut world = playing_world();
        world.hud_messages.push(HudMessage {
            text: "old".into(),
            remaining_ms: 500.0,
            y: 0.0,
        });
        activate(&mut world, PowerupKind::Shield);
        assert_eq!(world.hud_messages.len(), 1);
        assert_eq!(world.hud_messages[0].text, PowerupKind::Shield.description());
        assert_eq!(world.hud_messages[0].remaining_ms, 10_000.0);
    }

    #[test]
    fn test_speed_round_trip() {
        let mut world = playing_world();
        activate(&mut world, PowerupKind::Speed);
        assert_eq!(world.game_speed, 7.5);
        expire(&mut world);
        assert_eq!(world.game_speed, 5.0);
        assert!(world.active_effect.is_none());
    }

    #[test]
    fn test_slowmo_round_trip() {
        let mut world = playing_world();
        activate(&mut world, PowerupKind::Slowmo);
        assert_eq!(world.game_speed, 2.5);
        expire(&mut world);
        assert_eq!(world.game_speed, 5.0);
        assert_eq!(world.speed_factor, 1.0);
    }

    #[test]
    fn test_minisize_restores_exact_size() {
        let mut world = playing_world();
        world.character.width = 40.123;
        world.character.height = 39.987;
        activate(&mut world, PowerupKind::Minisize);
        assert!(world.character.width < 40.0);
        expire(&mut world);
        assert_eq!(world.character.width.to_bits(), 40.123f32.to_bits());
        assert_eq!(world.character.height.to_bits(), 39.987f32.to_bits());
    }

    #[test]
    fn test_minisize_keeps_feet_on_ground() {
        let mut world = playing_world();
        activate(&mut world, PowerupKind::Minisize);
        let c = &world.character;
        assert_eq!(c.pos.y + c.height, world.tuning.ground_y());
    }

    #[test]
    fn test_flight_expiry_drops_instead_of_snapping() {
        let mut world = playing_world();
        activate(&mut world, PowerupKind::Flight);
        world.character.pos.y = 200.0;
        expire(&mut world);
        assert_eq!(world.character.pos.y, 200.0);
        assert!(world.character.is_jumping);
        assert!(world.character.jump_force < 0.0);
    }

    #[test]
    fn test_lucky_break_grants_coins() {
        let mut world = playing_world();
        activate(&mut world, PowerupKind::LuckyBreak);
        assert_eq!(world.coins.len(), 10);
    }

    #[test]
    fn test_timer_expiry_emits_event() {
        let mut world = playing_world();
        activate(&mut world, PowerupKind::GhostMode);
        update_timer(&mut world, 9_999.0);
        assert!(world.active_effect.is_some());
        update_timer(&mut world, 1.0);
        assert!(world.active_effect.is_none());
        assert!(world
            .take_events()
            .contains(&GameEvent::PowerupExpired { kind: PowerupKind::GhostMode }));
        assert_eq!(world.mode, GameMode::Playing);
    }

    #[test]
    fn test_remaining_fraction() {
        let mut effect = ActiveEffect::new(PowerupKind::Magnet, 10_000.0);
        assert_eq!(effect.remaining_fraction(), 1.0);
        effect.remaining_ms = 2_500.0;
        assert_eq!(effect.remaining_fraction(), 0.25);
        effect.remaining_ms = -5.0;
        assert_eq!(effect.remaining_fraction(), 0.0);
    }

    #[test]
    fn test_magnet_pulls_only_nearby_coins() {
        let mut world = playing_world();
        let center = world.character.center();
        let near = center + Vec2::new(100.0, 0.0);
        let far = center + Vec2::new(400.0, 0.0);
        for pos in [near, far] {
            world.coins.push(Coin {
                pos,
                size: 15.0,
                value: 1,
                is_special: false,
                collected: false,
            });
        }
        activate(&mut world, PowerupKind::Magnet);
        apply_magnet(&mut world, 1.0);
        assert!(world.coins[0].pos.x < near.x);
        assert_eq!(world.coins[1].pos, far);
    }
}
