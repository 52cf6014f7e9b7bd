//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `Volume`: engine gain steps 0–21, clamped at both ends
//! - `Brightness`: backlight level, stepping wraps like the display register
//! - `SampleRateHz`: validates 8000–96000 Hz range
//! - `I2cAddr`: rejects reserved 7-bit addresses

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── Volume ───────────────────────────────────────────────────────────────────

/// Output gain in engine steps, clamped to `0..=21`.
///
/// Construct with [`Volume::new`] (clamping) or [`Volume::try_new`]
/// (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Volume(u8);

impl Volume {
    /// Loudest step.
    pub const MAX: u8 = 21;
    /// Power-on level.
    pub const DEFAULT: u8 = 10;
    /// Amount one volume key press moves.
    pub const STEP: u8 = 4;

    /// Create a `Volume`, clamping values above [`Volume::MAX`].
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Create a `Volume`, returning an error if `value > 21`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 21`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// One step louder, saturating at [`Volume::MAX`].
    #[must_use]
    pub fn step_up(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    /// One step quieter, saturating at zero.
    #[must_use]
    pub fn step_down(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP))
    }

    /// Return the inner step value (0–21).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

// ── Brightness ───────────────────────────────────────────────────────────────

/// Backlight level.
///
/// [`Brightness::step_up`] wraps past 255 back to the bottom of the range,
/// so a single key cycles through every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Brightness(u8);

impl Brightness {
    /// Amount one brightness key press moves.
    pub const STEP: u8 = 64;
    /// Power-on level.
    pub const DEFAULT: u8 = 128;

    /// Wrap a raw backlight level.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// One step brighter, wrapping.
    #[must_use]
    pub fn step_up(self) -> Self {
        Self(self.0.wrapping_add(Self::STEP))
    }

    /// Return the raw level.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range both codecs accept.
///
/// Valid range: 8000–96000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate.
    pub const MAX_HZ: u32 = 96_000;

    /// CD rate, used for the bring-up tone and the amplifier rate register.
    pub const CD: Self = Self(44_100);

    /// Create a `SampleRateHz`, returning an error if out of 8000–96000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 96000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if !(Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

// ── I2cAddr ──────────────────────────────────────────────────────────────────

/// I2C 7-bit address.
///
/// ## Reserved I2C addresses (I2C specification):
/// - 0x00–0x07: reserved (general call, CBUS, etc.)
/// - 0x78–0x7F: reserved (10-bit address prefix, device ID, etc.)
///
/// ## Usage:
/// ```rust
/// use platform::audio_types::I2cAddr;
///
/// let codec = I2cAddr::new(0x18);
/// assert!(I2cAddr::try_new(0x7C).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct I2cAddr(u8);

impl I2cAddr {
    /// Create an I2C address without checking reserved ranges.
    ///
    /// Use this only when the address is a known hardware-fixed constant.
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr)
    }

    /// Create an I2C address, rejecting I2C-reserved ranges.
    ///
    /// Reserved: 0x00–0x07 (general call etc.) and 0x78–0x7F (10-bit prefix).
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `addr <= 0x07` or `addr >= 0x78`.
    pub fn try_new(addr: u8) -> Result<Self, OutOfRangeError> {
        if addr <= 0x07 || addr >= 0x78 {
            Err(OutOfRangeError {
                value: u32::from(addr),
                min: 0x08,
                max: 0x77,
            })
        } else {
            Ok(Self(addr))
        }
    }

    /// Return the 7-bit I2C address.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}
