//! Frame driver
//!
//! Owns one world plus its collaborators and turns animation-frame
//! timestamps into simulation ticks. Input arrives as commands between
//! frames; storage and telemetry are serviced after the ticks of a frame,
//! never in the middle of one.

use serde_json::json;

use crate::highscores::HighScores;
use crate::persistence::Storage;
use crate::platform::FrameClock;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{GameEvent, GameMode, RenderView, TickInput, World, tick};
use crate::telemetry::Telemetry;

/// Longest single simulation step (ms)
pub const MAX_STEP_MS: f32 = 50.0;
/// Maximum substeps per frame; anything beyond is dropped
pub const MAX_SUBSTEPS: u32 = 8;

pub struct Session<S: Storage> {
    world: World,
    high_scores: HighScores<S>,
    settings: Settings,
    telemetry: Telemetry,
    clock: FrameClock,
    input: TickInput,
}

impl<S: Storage> Session<S> {
    /// Wrap `world`, loading the stored best score and settings
    pub fn new(mut world: World, storage: S, mut telemetry: Telemetry) -> Self {
        let high_scores = HighScores::new(storage);
        world.high_score = high_scores.get();

        let settings = Settings::load(high_scores.storage());
        settings.apply_to(&mut world);

        log::info!(
            "Session ready (seed {}, best {}, quality {})",
            world.seed,
            world.high_score,
            settings.quality.as_str()
        );
        telemetry.emit("canvas_start", json!({}));

        Self {
            world,
            high_scores,
            settings,
            telemetry,
            clock: FrameClock::new(),
            input: TickInput::default(),
        }
    }

    // === Commands (applied on the next tick) ===

    pub fn start_game(&mut self) {
        self.input.start = true;
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn jump(&mut self) {
        self.input.jump = true;
    }

    pub fn set_moving_left(&mut self, moving: bool) {
        self.input.moving_left = moving;
    }

    pub fn set_moving_right(&mut self, moving: bool) {
        self.input.moving_right = moving;
    }

    pub fn set_moving_up(&mut self, moving: bool) {
        self.input.moving_up = moving;
    }

    pub fn set_moving_down(&mut self, moving: bool) {
        self.input.moving_down = moving;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    // === Frame loop ===

    /// Advance to `timestamp_ms` and return the events raised on the way
    pub fn frame(&mut self, timestamp_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.delta(timestamp_ms);
        self.advance(dt)
    }

    /// Advance by `dt` ms in bounded substeps
    pub fn advance(&mut self, dt: f32) -> Vec<GameEvent> {
        if !dt.is_finite() || dt <= 0.0 {
            // One-shot commands wait for a frame that actually ticks
            return Vec::new();
        }

        let budget = MAX_STEP_MS * MAX_SUBSTEPS as f32;
        if dt > budget {
            log::debug!("Dropping {:.0}ms of a {:.0}ms frame", dt - budget, dt);
        }
        let mut remaining = dt.min(budget);
        let mut substeps = 0;
        while remaining > 0.0 && substeps < MAX_SUBSTEPS {
            let step = remaining.min(MAX_STEP_MS);

            if self.input.start || (self.input.autopilot && self.world.mode == GameMode::Idle) {
                self.world.high_score = self.high_scores.get();
            }

            let input = self.input.clone();
            tick(&mut self.world, &input, step);
            remaining -= step;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.pause = false;
            self.input.jump = false;
        }

        let events = self.world.take_events();
        for event in &events {
            match event {
                GameEvent::ScoreUpdate { score } | GameEvent::GameOver { score, .. } => {
                    self.high_scores.record(*score);
                }
                GameEvent::Jump
                | GameEvent::PowerupActivated { .. }
                | GameEvent::PowerupExpired { .. } => {}
            }
            self.telemetry.emit_event(event);
        }
        events
    }

    /// Forget the last frame time (e.g. the page was hidden)
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    // === Read side ===

    pub fn view(&self) -> RenderView<'_> {
        RenderView::of(&self.world)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn high_score(&self) -> u64 {
        self.high_scores.get()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings, apply them to the world and persist them
    pub fn set_settings(&mut self, settings: Settings) {
        settings.apply_to(&mut self.world);
        settings.save(self.high_scores.storage_mut());
        self.settings = settings;
    }

    /// Switch quality preset, keeping the other preferences
    pub fn set_quality(&mut self, preset: QualityPreset) {
        let mut settings = self.settings.clone();
        settings.apply_preset(preset);
        self.set_settings(settings);
    }

    pub fn storage(&self) -> &S {
        self.high_scores.storage()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use serde_json::Value;

    use super::*;
    use crate::highscores::STORAGE_KEY;
    use crate::persistence::MemoryStorage;
    use crate::sim::{Obstacle, ObstacleKind};
    use crate::telemetry::{TelemetryError, TelemetrySink};
    use crate::tuning::Tuning;

    #[derive(Clone, Default)]
    struct Recorder {
        names: Rc<RefCell<Vec<String>>>,
    }

    impl TelemetrySink for Recorder {
        fn push_event(&mut self, name: &str, _payload: &Value) -> Result<(), TelemetryError> {
            self.names.borrow_mut().push(name.to_string());
            Ok(())
        }
    }

    fn quiet_world() -> World {
        let mut world = World::with_seed(Tuning::default(), 77);
        world.tuning.coin_spawn_chance = 0.0;
        world
    }

    fn session(storage: MemoryStorage) -> (Session<MemoryStorage>, Recorder) {
        let recorder = Recorder::default();
        let telemetry = Telemetry::new(Box::new(recorder.clone()));
        (Session::new(quiet_world(), storage, telemetry), recorder)
    }

    #[test]
    fn test_canvas_start_on_construction() {
        let (_session, recorder) = session(MemoryStorage::new());
        assert_eq!(*recorder.names.borrow(), vec!["canvas_start"]);
    }

    #[test]
    fn test_substep_split() {
        let (mut session, _) = session(MemoryStorage::new());
        session.start_game();
        session.advance(120.0);
        assert_eq!(session.world().elapsed_ms, 120.0);

        // Capped at MAX_SUBSTEPS * MAX_STEP_MS
        session.advance(10_000.0);
        assert_eq!(session.world().elapsed_ms, 120.0 + 400.0);
    }

    #[test]
    fn test_commands_wait_for_real_frame() {
        let (mut session, _) = session(MemoryStorage::new());
        session.start_game();
        session.frame(1000.0); // first frame, dt = 0
        assert_eq!(session.world().mode, GameMode::Idle);
        session.frame(1016.0);
        assert_eq!(session.world().mode, GameMode::Playing);
    }

    #[test]
    fn test_one_shot_commands_apply_once() {
        let (mut session, _) = session(MemoryStorage::new());
        session.start_game();
        session.advance(16.0);
        session.toggle_pause();
        // Several substeps; the pause must not toggle back
        session.advance(200.0);
        assert_eq!(session.world().mode, GameMode::Paused);
    }

    #[test]
    fn test_high_score_persisted_on_game_over() {
        let storage = MemoryStorage::new();
        let (mut session, recorder) = session(storage.clone());
        session.start_game();
        session.advance(16.0);

        let world = session.world_mut();
        world.score = 25;
        let c = world.character.pos;
        world.obstacles.push(Obstacle {
            pos: Vec2::new(c.x + 5.0, c.y),
            width: 30.0,
            height: 40.0,
            kind: ObstacleKind::Ground,
            passed: false,
        });
        let events = session.advance(16.0);

        assert!(events.contains(&GameEvent::GameOver {
            score: 25,
            new_high_score: true
        }));
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("25"));
        assert_eq!(session.high_score(), 25);
        assert!(recorder.names.borrow().contains(&"game_over".to_string()));
    }

    #[test]
    fn test_start_reloads_stored_best() {
        let mut storage = MemoryStorage::new();
        let (mut session, _) = session(storage.clone());
        storage.set_item(STORAGE_KEY, "40").unwrap();
        session.start_game();
        session.advance(16.0);
        assert_eq!(session.world().high_score, 40);
    }

    #[test]
    fn test_settings_persist_and_apply() {
        let storage = MemoryStorage::new();
        let (mut session, _) = session(storage.clone());
        session.set_settings(Settings::from_preset(QualityPreset::High));
        assert_eq!(session.world().ambience.particle_floor, 30);
        assert_eq!(Settings::load(&storage).quality, QualityPreset::High);
    }

    #[test]
    fn test_set_quality_keeps_other_preferences() {
        let storage = MemoryStorage::new();
        let (mut session, _) = session(storage.clone());
        session.set_settings(Settings {
            reduced_motion: true,
            ..Settings::default()
        });
        session.set_quality(QualityPreset::Low);

        let saved = Settings::load(&storage);
        assert_eq!(saved.quality, QualityPreset::Low);
        assert!(saved.reduced_motion);
        assert!(!session.world().ambience.scenery_enabled);
        assert_eq!(session.world().ambience.particle_floor, 8);
    }
}
