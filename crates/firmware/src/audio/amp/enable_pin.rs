//! Amplifier gated by one active-high output pin.

use embedded_hal::digital::OutputPin;

use super::AmpDriver;

/// Amplifier behind an enable GPIO.
pub struct EnablePinAmp<P: OutputPin> {
    pin: P,
    enabled: bool,
}

impl<P: OutputPin> EnablePinAmp<P> {
    /// Take ownership of the enable pin and drive it low.
    pub fn new(mut pin: P) -> Self {
        if let Err(e) = pin.set_low() {
            tracing::warn!(error = ?e, "amplifier enable pin write failed");
        }
        Self { pin, enabled: false }
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> AmpDriver for EnablePinAmp<P> {
    type Error = P::Error;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()?;
        self.enabled = true;
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()?;
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
