//! Best-score persistence
//!
//! A single integer under a fixed key. Storage trouble never reaches the
//! game: unreadable values count as zero and failed writes are logged.

use crate::persistence::Storage;

/// Storage key shared with earlier browser builds
pub const STORAGE_KEY: &str = "catRunnerHighScore";

/// Best score backed by a storage adapter
#[derive(Debug, Clone)]
pub struct HighScores<S> {
    storage: S,
}

impl<S: Storage> HighScores<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored best score; missing or malformed values read as 0
    pub fn get(&self) -> u64 {
        match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => parse_score(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring malformed high score {:?}", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read high score: {}", e);
                0
            }
        }
    }

    /// Store `score` if it beats the stored best. Returns true when written.
    pub fn record(&mut self, score: u64) -> bool {
        let best = self.get();
        if score <= best {
            return false;
        }
        match self.storage.set_item(STORAGE_KEY, &score.to_string()) {
            Ok(()) => {
                log::info!("High score saved: {}", score);
                true
            }
            Err(e) => {
                log::warn!("Failed to save high score {}: {}", score, e);
                false
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

/// Integer text, or float text truncated toward zero; negatives are invalid
fn parse_score(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(score) = raw.parse::<u64>() {
        return Some(score);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}
