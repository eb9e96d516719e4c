//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing
//! - Storage (LocalStorage on web)
//! - Telemetry delivery to the host page

mod clock;
#[cfg(target_arch = "wasm32")]
mod web;

pub use clock::FrameClock;
#[cfg(target_arch = "wasm32")]
pub use web::{JsCallbackSink, LocalStorage, WebRunner};
