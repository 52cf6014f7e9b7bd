//! Headphone jack monitor (advanced board).
//!
//! Polls the active-low detect pin and re-gates the speaker amplifier only
//! when the jack state changes: inserted disables it, removed enables it.

use embassy_time::Timer;
use embedded_hal::digital::InputPin;
use platform::config::HEADPHONE_POLL_MS;

use super::amp::AmpDriver;

/// Owns the amplifier and detect pin after bring-up.
pub struct HeadphoneMonitor<A, H> {
    amp: A,
    detect: H,
    inserted: bool,
}

impl<A: AmpDriver, H: InputPin> HeadphoneMonitor<A, H> {
    /// Monitor starting from a known jack state.
    pub fn new(amp: A, detect: H, inserted: bool) -> Self {
        Self {
            amp,
            detect,
            inserted,
        }
    }

    /// Last jack state acted on.
    pub fn inserted(&self) -> bool {
        self.inserted
    }

    /// The amplifier driver.
    pub fn amp(&self) -> &A {
        &self.amp
    }

    /// The detect pin.
    pub fn detect_mut(&mut self) -> &mut H {
        &mut self.detect
    }

    /// Read the jack once. Returns the new state if it changed.
    ///
    /// An unreadable pin or a failed amplifier call leaves the recorded
    /// state alone so the next poll tries again.
    pub async fn poll(&mut self) -> Option<bool> {
        let inserted = match self.detect.is_low() {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(error = ?e, "headphone detect read failed");
                return None;
            }
        };
        if inserted == self.inserted {
            return None;
        }

        let gated = if inserted {
            self.amp.disable().await
        } else {
            self.amp.enable().await
        };
        if let Err(e) = gated {
            tracing::warn!(error = ?e, "amplifier gating failed");
            return None;
        }
        self.inserted = inserted;
        tracing::info!(inserted, "headphone jack changed");
        Some(inserted)
    }

    /// Poll forever at the headphone cadence.
    pub async fn run(mut self) -> ! {
        loop {
            let _ = self.poll().await;
            Timer::after_millis(HEADPHONE_POLL_MS).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::audio::amp::MockAmp;
    use platform::mocks::MockPin;
    use platform::PinState;

    fn monitor(level: PinState, inserted: bool) -> HeadphoneMonitor<MockAmp, MockPin> {
        HeadphoneMonitor::new(MockAmp::new(), MockPin::new(level), inserted)
    }

    #[tokio::test]
    async fn test_no_change_no_gating() {
        let mut m = monitor(PinState::High, false);
        assert_eq!(m.poll().await, None);
        assert_eq!(m.poll().await, None);
        assert_eq!(m.amp().enable_count, 0);
        assert_eq!(m.amp().disable_count, 0);
    }

    #[tokio::test]
    async fn test_insert_then_remove() {
        let mut m = monitor(PinState::High, false);
        m.detect_mut().set_level(PinState::Low);
        assert_eq!(m.poll().await, Some(true));
        assert!(!m.amp().is_enabled());
        assert_eq!(m.amp().disable_count, 1);

        m.detect_mut().set_level(PinState::High);
        assert_eq!(m.poll().await, Some(false));
        assert!(m.amp().is_enabled());
        assert_eq!(m.amp().enable_count, 1);
        assert!(!m.inserted());
    }

    #[tokio::test]
    async fn test_failed_gating_retries_next_poll() {
        let amp = MockAmp {
            fail: true,
            ..MockAmp::new()
        };
        let mut m = HeadphoneMonitor::new(amp, MockPin::new(PinState::Low), false);
        assert_eq!(m.poll().await, None);
        assert!(!m.inserted());
    }
}
