//! Entity factories
//!
//! Pure functions of the world bounds and an RNG: each call returns fresh
//! records and touches no world state.

use glam::Vec2;
use rand::Rng;

use super::powerup::PowerupKind;
use super::state::{Coin, Obstacle, ObstacleKind, PowerupPickup};
use crate::tuning::Tuning;

pub const OBSTACLE_WIDTH: f32 = 30.0;
pub const COIN_SIZE: f32 = 15.0;
pub const GOLDEN_COIN_SIZE: f32 = 20.0;
pub const GOLDEN_COIN_VALUE: u64 = 5;
pub const PICKUP_SIZE: f32 = 25.0;
/// Horizontal gap between coins in a row
const COIN_SPACING: f32 = 30.0;

/// Fixed coin layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinPattern {
    /// Five coins at one height
    Line,
    /// Five coins along a sine arc
    Arc,
    /// Three coins stacked vertically
    Stack,
    /// One high-value coin
    Golden,
}

impl CoinPattern {
    pub const ALL: [CoinPattern; 4] = [
        CoinPattern::Line,
        CoinPattern::Arc,
        CoinPattern::Stack,
        CoinPattern::Golden,
    ];
}

/// New obstacle just past the right edge: 70% ground, 30% flying
pub fn obstacle<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Obstacle {
    let kind = if rng.random::<f32>() < 0.7 {
        ObstacleKind::Ground
    } else {
        ObstacleKind::Flying
    };
    let ground_y = tuning.ground_y();

    let (height, y) = match kind {
        ObstacleKind::Ground => {
            let height = rng.random_range(30.0f32..50.0);
            (height, ground_y - height)
        }
        ObstacleKind::Flying => {
            let height = rng.random_range(20.0f32..35.0);
            // Bands above the ground; the middle one sits at coin height
            let band = rng.random::<f32>();
            let lift = if band < 0.6 {
                80.0 + rng.random::<f32>() * 70.0
            } else if band < 0.85 {
                20.0 + rng.random::<f32>() * 60.0
            } else {
                150.0 + rng.random::<f32>() * 50.0
            };
            (height, ground_y - height - lift)
        }
    };

    log::debug!("Spawned {:?} obstacle (h={:.1}, y={:.1})", kind, height, y);
    Obstacle {
        pos: Vec2::new(tuning.canvas_width, y),
        width: OBSTACLE_WIDTH,
        height,
        kind,
        passed: false,
    }
}

/// One coin batch in a uniformly chosen pattern
pub fn coin_pattern<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Vec<Coin> {
    let index = rng.random_range(0..CoinPattern::ALL.len());
    coin_pattern_of(CoinPattern::ALL[index], rng, tuning)
}

/// One coin batch in the given pattern, starting at the right edge
pub fn coin_pattern_of<R: Rng + ?Sized>(
    pattern: CoinPattern,
    rng: &mut R,
    tuning: &Tuning,
) -> Vec<Coin> {
    let ground_y = tuning.ground_y();
    let x0 = tuning.canvas_width;

    match pattern {
        CoinPattern::Line => {
            let y = ground_y - 50.0 - rng.random::<f32>() * 100.0;
            coin_line(x0, y)
        }
        CoinPattern::Arc => (0..5)
            .map(|i| {
                let i = i as f32;
                coin(
                    Vec2::new(x0 + i * COIN_SPACING, ground_y - 50.0 - (i * 0.6).sin() * 100.0),
                    COIN_SIZE,
                    1,
                )
            })
            .collect(),
        CoinPattern::Stack => (0..3)
            .map(|i| {
                coin(
                    Vec2::new(x0 + COIN_SPACING, ground_y - 40.0 - i as f32 * 40.0),
                    COIN_SIZE,
                    1,
                )
            })
            .collect(),
        CoinPattern::Golden => {
            let y = ground_y - 100.0 - rng.random::<f32>() * 50.0;
            vec![Coin {
                is_special: true,
                ..coin(Vec2::new(x0 + COIN_SPACING, y), GOLDEN_COIN_SIZE, GOLDEN_COIN_VALUE)
            }]
        }
    }
}

/// Five ordinary coins in a row starting at `x`
pub fn coin_line(x: f32, y: f32) -> Vec<Coin> {
    (0..5)
        .map(|i| coin(Vec2::new(x + i as f32 * COIN_SPACING, y), COIN_SIZE, 1))
        .collect()
}

/// Power-up of a uniformly drawn kind, at `at` or just past the right edge
pub fn powerup<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, at: Option<Vec2>) -> PowerupPickup {
    let index = rng.random_range(0..PowerupKind::ALL.len());
    debug_assert!(index < PowerupKind::ALL.len(), "power-up index outside catalog");
    let kind = PowerupKind::ALL[index];

    let pos = at.unwrap_or_else(|| {
        Vec2::new(
            tuning.canvas_width + 50.0,
            tuning.ground_y() - 100.0 - rng.random::<f32>() * 50.0,
        )
    });

    log::debug!("Spawned {} pickup at ({:.0}, {:.0})", kind.as_str(), pos.x, pos.y);
    PowerupPickup {
        pos,
        kind,
        size: PICKUP_SIZE,
        collected: false,
    }
}

fn coin(pos: Vec2, size: f32, value: u64) -> Coin {
    Coin {
        pos,
        size,
        value,
        is_special: false,
        collected: false,
    }
}
