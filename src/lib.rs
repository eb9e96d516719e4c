//! Cat Runner - a side-scrolling arcade runner
//!
//! Core modules:
//! - `sim`: Simulation core (kinematics, spawning, collisions, power-ups)
//! - `session`: Frame driver tying the core to storage and telemetry
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key/value storage backends
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod telemetry;
pub mod tuning;

pub use highscores::HighScores;
pub use session::Session;
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};
