//! Speaker amplifier control
//!
//! The advanced board gates its speaker amplifier with a single active-high
//! enable GPIO. The standard board has no such pin (its amplifier is enabled
//! over the bus) and never uses this trait.
//!
//! - `enable_pin`: GPIO-driven driver
//! - `mock`: in-process mock for host tests and the simulator

#![allow(async_fn_in_trait)]

pub mod enable_pin;
pub mod mock;

pub use enable_pin::EnablePinAmp;
pub use mock::MockAmp;

/// Speaker amplifier driver trait.
pub trait AmpDriver {
    /// Error type returned by amplifier operations.
    type Error: core::fmt::Debug;

    /// Enable the amplifier (drive the enable pin high).
    async fn enable(&mut self) -> Result<(), Self::Error>;

    /// Disable the amplifier (drive the enable pin low).
    async fn disable(&mut self) -> Result<(), Self::Error>;

    /// Returns `true` if the amplifier is currently enabled.
    fn is_enabled(&self) -> bool;
}
