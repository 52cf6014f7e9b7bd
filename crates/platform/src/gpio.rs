//! GPIO pin map
//!
//! Pin *driving* goes through `embedded_hal::digital`; this module only
//! describes which pins a board variant routes to each audio role. Absent
//! roles are `None`.

/// GPIO number on the SoC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioNum(pub u8);

/// Logical pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// Logic low (0V)
    Low,
    /// Logic high (VCC)
    High,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

/// Pins used by the audio path of one board variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwarePins {
    /// Two-wire bus clock.
    pub bus_clock: Option<GpioNum>,
    /// Two-wire bus data.
    pub bus_data: Option<GpioNum>,
    /// I2S bit clock.
    pub audio_clock: Option<GpioNum>,
    /// I2S frame (word select) clock.
    pub audio_frame_clock: Option<GpioNum>,
    /// I2S serial data out.
    pub audio_data: Option<GpioNum>,
    /// Headphone jack detect input, active low.
    pub headphone_detect: Option<GpioNum>,
    /// Speaker amplifier enable output, active high.
    pub amplifier_enable: Option<GpioNum>,
}

impl HardwarePins {
    /// A map with every role absent.
    pub const NONE: Self = Self {
        bus_clock: None,
        bus_data: None,
        audio_clock: None,
        audio_frame_clock: None,
        audio_data: None,
        headphone_detect: None,
        amplifier_enable: None,
    };
}
