//! Browser adapters and the JavaScript-facing runner

use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::persistence::{MemoryStorage, Storage, StorageError};
use crate::session::Session;
use crate::settings::QualityPreset;
use crate::sim::World;
use crate::telemetry::{Telemetry, TelemetryError, TelemetrySink};
use crate::tuning::Tuning;

fn unavailable(e: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", e))
}

/// `window.localStorage`
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let inner = window
            .local_storage()
            .map_err(unavailable)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(unavailable)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(unavailable)
    }
}

/// Forwards events to a page callback `(name, payload) => void`
pub struct JsCallbackSink {
    callback: js_sys::Function,
}

impl JsCallbackSink {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

impl TelemetrySink for JsCallbackSink {
    fn push_event(&mut self, name: &str, payload: &Value) -> Result<(), TelemetryError> {
        let payload = js_sys::JSON::parse(&payload.to_string())
            .map_err(|e| TelemetryError::Rejected(format!("{:?}", e)))?;
        self.callback
            .call2(&JsValue::NULL, &JsValue::from_str(name), &payload)
            .map_err(|e| TelemetryError::Rejected(format!("{:?}", e)))?;
        Ok(())
    }
}

/// Game session driven from `requestAnimationFrame` on the page
#[wasm_bindgen]
pub struct WebRunner {
    session: Session<Box<dyn Storage>>,
}

#[wasm_bindgen]
impl WebRunner {
    /// `on_event` receives `(name, payload)` for every telemetry event
    #[wasm_bindgen(constructor)]
    pub fn new(on_event: Option<js_sys::Function>) -> WebRunner {
        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; high score will not persist", e);
                Box::new(MemoryStorage::new())
            }
        };
        let telemetry = match on_event {
            Some(callback) => Telemetry::new(Box::new(JsCallbackSink::new(callback))),
            None => Telemetry::disabled(),
        };
        let world = World::new(Tuning::default());
        WebRunner {
            session: Session::new(world, storage, telemetry),
        }
    }

    pub fn start_game(&mut self) {
        self.session.start_game();
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn jump(&mut self) {
        self.session.jump();
    }

    pub fn set_moving_left(&mut self, moving: bool) {
        self.session.set_moving_left(moving);
    }

    pub fn set_moving_right(&mut self, moving: bool) {
        self.session.set_moving_right(moving);
    }

    pub fn set_moving_up(&mut self, moving: bool) {
        self.session.set_moving_up(moving);
    }

    pub fn set_moving_down(&mut self, moving: bool) {
        self.session.set_moving_down(moving);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.session.set_autopilot(enabled);
    }

    /// Advance to the `requestAnimationFrame` timestamp
    pub fn frame(&mut self, timestamp: f64) {
        self.session.frame(timestamp);
    }

    /// Call when the page becomes visible again
    pub fn reset_clock(&mut self) {
        self.session.reset_clock();
    }

    /// Render read model as JSON
    pub fn snapshot_json(&self) -> String {
        self.session.view().to_json().unwrap_or_else(|e| {
            log::warn!("Snapshot encoding failed: {}", e);
            String::from("{}")
        })
    }

    /// Switch to a named quality preset; false if the name is unknown
    pub fn set_quality(&mut self, name: &str) -> bool {
        match QualityPreset::parse(name) {
            Some(preset) => {
                self.session.set_quality(preset);
                true
            }
            None => {
                log::warn!("Unknown quality preset '{}'", name);
                false
            }
        }
    }

    pub fn high_score(&self) -> f64 {
        self.session.high_score() as f64
    }
}
