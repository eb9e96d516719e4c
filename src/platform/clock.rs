//! Timestamp to delta conversion

/// Turns animation-frame timestamps (ms) into per-frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous timestamp. The first frame, a clock
    /// that went backwards and a non-finite timestamp all yield 0.
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        if !timestamp_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last {
            Some(last) if timestamp_ms > last => (timestamp_ms - last) as f32,
            Some(last) if timestamp_ms < last => {
                log::debug!("Clock went backwards ({} -> {})", last, timestamp_ms);
                0.0
            }
            _ => 0.0,
        };
        self.last = Some(self.last.map_or(timestamp_ms, |last| last.max(timestamp_ms)));
        dt
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last = None;
    }
}
