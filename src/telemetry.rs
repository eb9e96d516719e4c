//! Fire-and-forget event reporting
//!
//! The game never depends on an observer: with no sink attached, or with a
//! sink that fails, emitting is a no-op apart from a log line.

use serde_json::{Value, json};
use thiserror::Error;

use crate::sim::GameEvent;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry endpoint unavailable")]
    Unavailable,
    #[error("telemetry event rejected: {0}")]
    Rejected(String),
}

/// Receiver of named events with JSON payloads
pub trait TelemetrySink {
    fn push_event(&mut self, name: &str, payload: &Value) -> Result<(), TelemetryError>;
}

/// Wire name and payload for a simulation event
pub fn encode(event: &GameEvent) -> (&'static str, Value) {
    match event {
        GameEvent::Jump => ("jump", json!({})),
        GameEvent::ScoreUpdate { score } => ("score_update", json!({ "score": score })),
        GameEvent::GameOver {
            score,
            new_high_score,
        } => (
            "game_over",
            json!({ "score": score, "newHighScore": new_high_score }),
        ),
        GameEvent::PowerupActivated { kind } => {
            ("powerup_activated", json!({ "kind": kind.as_str() }))
        }
        GameEvent::PowerupExpired { kind } => ("powerup_expired", json!({ "kind": kind.as_str() })),
    }
}

/// Optional sink with errors swallowed
#[derive(Default)]
pub struct Telemetry {
    sink: Option<Box<dyn TelemetrySink>>,
}

impl Telemetry {
    /// Telemetry that drops everything
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn new(sink: Box<dyn TelemetrySink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Send a named event; failures are logged and discarded
    pub fn emit(&mut self, name: &str, payload: Value) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.push_event(name, &payload) {
            log::warn!("Telemetry event {} dropped: {}", name, e);
        }
    }

    pub fn emit_event(&mut self, event: &GameEvent) {
        let (name, payload) = encode(event);
        self.emit(name, payload);
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Writes every event to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn push_event(&mut self, name: &str, payload: &Value) -> Result<(), TelemetryError> {
        log::debug!("event {} {}", name, payload);
        Ok(())
    }
}
