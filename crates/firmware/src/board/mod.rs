//! Board variants: detection, per-variant audio bring-up, keyboard driver
//! selection.
//!
//! Vertically sliced: one sub-directory per audio chip.
//!
//! # Structure
//!
//! - `detect`: [`detect`] and [`keyboard_driver`] over bus probes
//! - `es8311/`: advanced board: ES8311 codec, amp enable, headphone detect
//! - `aw88298/`: standard board: AW88298 amplifier behind an AW9523 expander
//!
//! Each variant implements [`AudioBoard`]; [`crate::audio::CodecBringup`]
//! picks one from the detected [`BoardVariant`] and falls back to the other.

#![allow(async_fn_in_trait)]

pub mod aw88298;
pub mod detect;
pub mod es8311;

pub use aw88298::StandardBoard;
pub use detect::{detect, keyboard_driver};
pub use es8311::AdvancedBoard;

use embedded_hal_async::delay::DelayNs;
use platform::board_config::BusClock;
use platform::{HardwarePins, I2cConfig, I2cPeripheral};

/// Hardware configuration the firmware is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardVariant {
    /// Detection found no evidence either way.
    #[default]
    Unknown,
    /// ES8311 codec, TCA8418 keyboard controller.
    Advanced,
    /// AW88298 amplifier, matrix keyboard.
    Standard,
}

impl BoardVariant {
    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            BoardVariant::Unknown => "unknown",
            BoardVariant::Advanced => "advanced",
            BoardVariant::Standard => "standard",
        }
    }
}

/// Board identity reported by the SoC support package, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardHint {
    /// Identifies as the advanced board.
    Advanced,
    /// Identifies as the standard board.
    Standard,
    /// No usable identity.
    #[default]
    Other,
}

/// Keyboard scanning backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyboardDriver {
    /// GPIO matrix scanned by the SoC.
    Matrix,
    /// TCA8418 controller on the two-wire bus.
    Tca8418,
}

/// One byte-wide register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOp {
    /// Register address.
    pub register: u8,
    /// Value written.
    pub value: u8,
}

/// Why a variant's bring-up failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringupError {
    /// The bus refused the clock change.
    #[error("bus refused clock change")]
    BusConfig,
    /// A codec register write was not acknowledged. Carries the first
    /// failing register; later writes were still attempted.
    #[error("register 0x{register:02X} write not acknowledged")]
    RegisterWrite {
        /// First register that failed.
        register: u8,
    },
    /// The amplifier enable pin could not be driven.
    #[error("amplifier enable pin error")]
    AmpPin,
    /// The headphone detect pin could not be read.
    #[error("headphone detect pin error")]
    DetectPin,
    /// Neither the amplifier nor its expander acknowledged.
    #[error("amplifier and expander unreachable")]
    AmplifierUnreachable,
}

/// One hardware variant's audio path.
pub trait AudioBoard {
    /// Which variant this is.
    fn variant(&self) -> BoardVariant;

    /// Pins the variant routes to the audio roles.
    fn pinout(&self) -> HardwarePins;

    /// Program the variant's audio hardware.
    async fn bring_up<B, D>(&mut self, bus: &mut B, delay: &mut D) -> Result<(), BringupError>
    where
        B: I2cPeripheral,
        D: DelayNs;
}

/// Re-initialise the bus at the probing clock and let it settle.
pub(crate) async fn reinit_bus<B, D>(bus: &mut B, delay: &mut D, settle_ms: u32) -> Result<(), BringupError>
where
    B: I2cPeripheral,
    D: DelayNs,
{
    bus.configure(I2cConfig::at(BusClock::PROBE_HZ))
        .map_err(|_| BringupError::BusConfig)?;
    delay.delay_ms(settle_ms).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_defaults_to_unknown() {
        assert_eq!(BoardVariant::default(), BoardVariant::Unknown);
        assert_eq!(BoardHint::default(), BoardHint::Other);
    }

    #[test]
    fn test_register_error_names_register() {
        let err = BringupError::RegisterWrite { register: 0x0D };
        assert_eq!(std::format!("{err}"), "register 0x0D write not acknowledged");
    }
}
