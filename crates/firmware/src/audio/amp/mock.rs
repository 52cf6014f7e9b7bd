//! Amplifier stand-in for host tests and the simulator.

use super::AmpDriver;

/// Error returned by [`MockAmp`] when told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAmpError;

/// Records gating calls; nothing is driven.
#[derive(Debug, Default)]
pub struct MockAmp {
    /// Speaker currently gated on.
    pub enabled: bool,
    /// Successful `enable` calls.
    pub enable_count: usize,
    /// Successful `disable` calls.
    pub disable_count: usize,
    /// Make every call fail without changing state.
    pub fail: bool,
}

impl MockAmp {
    /// Gated off, counters at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AmpDriver for MockAmp {
    type Error = MockAmpError;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockAmpError);
        }
        self.enabled = true;
        self.enable_count = self.enable_count.saturating_add(1);
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockAmpError);
        }
        self.enabled = false;
        self.disable_count = self.disable_count.saturating_add(1);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
