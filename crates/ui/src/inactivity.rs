//! Inactivity timer: time since the last key press, for screen dimming.

/// Tracks the timestamp of the most recent user activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct InactivityTimer {
    last_activity_ms: u64,
}

impl InactivityTimer {
    /// Timer whose last activity is `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_activity_ms: now_ms,
        }
    }

    /// Record activity at `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }

    /// Milliseconds since the last activity.
    #[must_use]
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_activity_ms)
    }
}
