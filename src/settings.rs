//! Player preferences
//!
//! Persisted as JSON under its own key, next to the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;
use crate::sim::World;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Ambient particles kept alive for this preset
    pub fn particle_floor(&self) -> usize {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 15,
            QualityPreset::High => 30,
        }
    }

    /// Whether parallax scenery is simulated
    pub fn scenery_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Ambient and burst particles
    pub particles: bool,
    /// Mountains, trees and bushes scrolling behind the track
    pub scenery: bool,
    /// No hover bob while flying
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            scenery: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "cat_runner_settings";

    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if !preset.scenery_enabled() {
            self.scenery = false;
        }
    }

    /// Effective ambient particle floor
    pub fn particle_floor(&self) -> usize {
        if self.particles {
            self.quality.particle_floor()
        } else {
            0
        }
    }

    /// Push presentation-related settings into a world
    pub fn apply_to(&self, world: &mut World) {
        world.ambience.particle_floor = self.particle_floor();
        world.ambience.scenery_enabled = self.scenery && self.quality.scenery_enabled();
        world.reduced_motion = self.reduced_motion;
    }

    /// Load from storage, falling back to defaults
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save to storage; failures are logged
    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {}", e);
                return;
            }
        };
        match storage.set_item(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::tuning::Tuning;

    #[test]
    fn test_round_trip_through_storage() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            quality: QualityPreset::High,
            particles: false,
            scenery: true,
            reduced_motion: true,
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_bad_json_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set_item(Settings::STORAGE_KEY, "{oops").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Settings::STORAGE_KEY, r#"{"quality":"Low"}"#)
            .unwrap();
        let settings = Settings::load(&storage);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.particles);
    }

    #[test]
    fn test_apply_to_world() {
        let mut world = World::with_seed(Tuning::default(), 1);
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.reduced_motion = true;
        settings.apply_to(&mut world);
        assert_eq!(world.ambience.particle_floor, 8);
        assert!(!world.ambience.scenery_enabled);
        assert!(world.reduced_motion);

        settings.particles = false;
        settings.apply_to(&mut world);
        assert_eq!(world.ambience.particle_floor, 0);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }
}
