//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`] so a build can ship a
//! different balance file without touching the simulation. Units follow the
//! simulation: positions in canvas pixels, times in milliseconds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a balance file was refused
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed balance file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be {rule}, got {value}")]
    Invalid {
        field: &'static str,
        rule: &'static str,
        value: f64,
    },
}

/// Gameplay constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World bounds ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Distance from the canvas bottom to the ground line
    pub ground_offset: f32,

    // === Character ===
    pub character_width: f32,
    pub character_height: f32,
    /// Left movement boundary
    pub min_x: f32,
    /// Gap kept between the character and the right canvas edge
    pub right_margin: f32,
    /// Start position as a fraction of the canvas width
    pub start_x_fraction: f32,
    /// Horizontal speed in pixels per reference frame
    pub move_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Scale applied to gravity while jumping (softer arcs)
    pub gravity_scale: f32,
    /// Horizontal velocity decay per reference frame with no intent
    pub friction: f32,
    /// Horizontal speeds below this snap to zero
    pub velocity_epsilon: f32,
    /// Inset applied to the character box for obstacle hits
    pub collision_margin: f32,
    /// Length of the frame the per-frame constants were authored against
    pub reference_frame_ms: f32,

    // === Scrolling / difficulty ===
    pub base_speed: f32,
    /// Score points per difficulty level used by the speed ramp
    pub speed_ramp_score_step: u64,
    /// Difficulty levels per +1 game speed
    pub speed_ramp_levels: u64,
    /// Converts `game_speed * dt_ms` into pixels
    pub position_scale: f32,

    // === Spawning ===
    pub obstacle_interval_ms: f32,
    /// Chance per tick of spawning a coin pattern
    pub coin_spawn_chance: f64,
    /// Coin pattern chance per tick while Lucky Break is active
    pub lucky_coin_spawn_chance: f64,
    /// Chance of a power-up dropping from a collected coin
    pub powerup_drop_chance: f64,
    /// Minimum combo before coins can drop power-ups
    pub powerup_drop_min_combo: u32,

    // === Combo ===
    pub combo_window_ms: f32,

    // === Power-ups ===
    pub powerup_duration_ms: f32,
    pub speed_boost_factor: f32,
    pub slowmo_factor: f32,
    pub minisize_factor: f32,
    pub coin_doubler_factor: u64,
    /// Fraction of normal obstacle speed while time is frozen
    pub freeze_factor: f32,
    pub super_dash_move_factor: f32,
    pub magnet_radius: f32,
    /// Fraction of the remaining distance a coin closes per reference frame
    pub magnet_pull: f32,
    /// Vertical speed while flying, pixels per reference frame
    pub flight_speed: f32,
    /// Highest point above the ground line reachable while flying
    pub flight_ceiling: f32,
    pub hover_amplitude: f32,
    /// Downward velocity applied when flight wears off
    pub flight_drop_impulse: f32,
    /// Coin patterns granted immediately by Lucky Break
    pub lucky_bonus_patterns: u32,

    // === Ambience ===
    /// Day/night phase advance per millisecond
    pub day_night_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 400.0,
            ground_offset: 10.0,

            character_width: 40.0,
            character_height: 40.0,
            min_x: 10.0,
            right_margin: 10.0,
            start_x_fraction: 0.2,
            move_speed: 5.0,
            jump_force: 15.0,
            gravity: 0.5,
            gravity_scale: 0.8,
            friction: 0.9,
            velocity_epsilon: 0.1,
            collision_margin: 8.0,
            reference_frame_ms: 1000.0 / 60.0,

            base_speed: 5.0,
            speed_ramp_score_step: 10,
            speed_ramp_levels: 10,
            position_scale: 0.1,

            obstacle_interval_ms: 1500.0,
            coin_spawn_chance: 0.01,
            lucky_coin_spawn_chance: 0.04,
            powerup_drop_chance: 0.2,
            powerup_drop_min_combo: 5,

            combo_window_ms: 2000.0,

            powerup_duration_ms: 10_000.0,
            speed_boost_factor: 1.5,
            slowmo_factor: 0.5,
            minisize_factor: 0.5,
            coin_doubler_factor: 2,
            freeze_factor: 0.02,
            super_dash_move_factor: 2.0,
            magnet_radius: 150.0,
            magnet_pull: 0.1,
            flight_speed: 4.0,
            flight_ceiling: 200.0,
            hover_amplitude: 0.5,
            flight_drop_impulse: 2.0,
            lucky_bonus_patterns: 2,

            day_night_speed: 0.000_02,
        }
    }
}

impl Tuning {
    /// Parse a balance file; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot step with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("canvas_width", self.canvas_width as f64),
            ("canvas_height", self.canvas_height as f64),
            ("character_width", self.character_width as f64),
            ("character_height", self.character_height as f64),
            ("reference_frame_ms", self.reference_frame_ms as f64),
            ("obstacle_interval_ms", self.obstacle_interval_ms as f64),
            ("combo_window_ms", self.combo_window_ms as f64),
            ("powerup_duration_ms", self.powerup_duration_ms as f64),
            ("speed_ramp_score_step", self.speed_ramp_score_step as f64),
            ("speed_ramp_levels", self.speed_ramp_levels as f64),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    rule: "a positive number",
                    value,
                });
            }
        }

        let non_negative = [
            ("ground_offset", self.ground_offset as f64),
            ("min_x", self.min_x as f64),
            ("right_margin", self.right_margin as f64),
            ("start_x_fraction", self.start_x_fraction as f64),
            ("move_speed", self.move_speed as f64),
            ("jump_force", self.jump_force as f64),
            ("gravity", self.gravity as f64),
            ("gravity_scale", self.gravity_scale as f64),
            ("friction", self.friction as f64),
            ("velocity_epsilon", self.velocity_epsilon as f64),
            ("collision_margin", self.collision_margin as f64),
            ("base_speed", self.base_speed as f64),
            ("position_scale", self.position_scale as f64),
            ("speed_boost_factor", self.speed_boost_factor as f64),
            ("slowmo_factor", self.slowmo_factor as f64),
            ("minisize_factor", self.minisize_factor as f64),
            ("freeze_factor", self.freeze_factor as f64),
            ("super_dash_move_factor", self.super_dash_move_factor as f64),
            ("magnet_radius", self.magnet_radius as f64),
            ("magnet_pull", self.magnet_pull as f64),
            ("flight_speed", self.flight_speed as f64),
            ("flight_ceiling", self.flight_ceiling as f64),
            ("hover_amplitude", self.hover_amplitude as f64),
            ("flight_drop_impulse", self.flight_drop_impulse as f64),
            ("day_night_speed", self.day_night_speed as f64),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    rule: "a finite non-negative number",
                    value,
                });
            }
        }

        let chances = [
            ("coin_spawn_chance", self.coin_spawn_chance),
            ("lucky_coin_spawn_chance", self.lucky_coin_spawn_chance),
            ("powerup_drop_chance", self.powerup_drop_chance),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid {
                    field,
                    rule: "a probability in [0, 1]",
                    value,
                });
            }
        }

        if self.max_x() < self.min_x {
            return Err(TuningError::Invalid {
                field: "min_x",
                rule: "left of the right movement boundary",
                value: self.min_x as f64,
            });
        }
        Ok(())
    }

    /// Y coordinate of the ground line
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.canvas_height - self.ground_offset
    }

    /// Right movement boundary for the default character width
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.canvas_width - self.character_width - self.right_margin
    }

    /// Base scroll speed for a score, before power-up factors
    pub fn speed_for_score(&self, score: u64) -> f32 {
        let step = self.speed_ramp_score_step.max(1);
        let levels = self.speed_ramp_levels.max(1);
        self.base_speed + ((score / step) / levels) as f32
    }
}

/// Difficulty level shown to the player
#[inline]
pub fn difficulty_for_score(score: u64) -> u32 {
    u32::try_from(score / 10)
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_ramp_steps_every_hundred_points() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_for_score(0), 5.0);
        assert_eq!(tuning.speed_for_score(99), 5.0);
        assert_eq!(tuning.speed_for_score(100), 6.0);
        assert_eq!(tuning.speed_for_score(250), 7.0);
    }

    #[test]
    fn test_speed_ramp_is_configurable() {
        // The faster ramp: +1 speed every 50 points
        let tuning = Tuning {
            speed_ramp_score_step: 5,
            ..Tuning::default()
        };
        assert_eq!(tuning.speed_for_score(49), 5.0);
        assert_eq!(tuning.speed_for_score(50), 6.0);
    }

    #[test]
    fn test_difficulty_for_score() {
        assert_eq!(difficulty_for_score(0), 1);
        assert_eq!(difficulty_for_score(9), 1);
        assert_eq!(difficulty_for_score(47), 5);
        assert_eq!(difficulty_for_score(u64::MAX), u32::MAX);
    }

    #[test]
    fn test_from_json_rejects_degenerate_values() {
        for json in [
            r#"{ "obstacle_interval_ms": 0.0 }"#,
            r#"{ "obstacle_interval_ms": -5.0 }"#,
            r#"{ "reference_frame_ms": 0.0 }"#,
            r#"{ "speed_ramp_levels": 0 }"#,
            r#"{ "speed_boost_factor": -1.5 }"#,
            r#"{ "coin_spawn_chance": 1.5 }"#,
            r#"{ "min_x": 900.0 }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, TuningError::Invalid { .. }), "{json}: {err}");
        }
    }

    #[test]
    fn test_from_json_reports_rejected_field() {
        let err = Tuning::from_json(r#"{ "obstacle_interval_ms": 0.0 }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, value, .. } => {
                assert_eq!(field, "obstacle_interval_ms");
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            Tuning::from_json("{ nope").unwrap_err(),
            TuningError::Parse(_)
        ));
    }

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_speed": 7.0 }"#).unwrap();
        assert_eq!(tuning.base_speed, 7.0);
        assert_eq!(tuning.obstacle_interval_ms, 1500.0);
    }

    #[test]
    fn test_bounds() {
        let tuning = Tuning::default();
        assert_eq!(tuning.ground_y(), 390.0);
        assert_eq!(tuning.max_x(), 750.0);
    }
}
