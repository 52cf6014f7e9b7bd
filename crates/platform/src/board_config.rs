//! Board wiring for the two supported handheld variants.
//!
//! Both variants share the two-wire bus and the I2S serial pins. They differ
//! in what sits on the bus:
//!
//! | Device              | Address | Variant  | Bus speed |
//! |---------------------|---------|----------|-----------|
//! | TCA8418 keyboard    | 0x34    | Advanced | 400 kHz   |
//! | ES8311 codec        | 0x18    | Advanced | 400 kHz   |
//! | AW88298 amplifier   | 0x36    | Standard | 400 kHz   |
//! | AW9523 IO expander  | 0x58    | Standard | 400 kHz   |
//!
//! The bus idles at 100 kHz; detection and bring-up re-initialise it there
//! before raising the clock per transaction.
//!
//! # Pin Assignments
//!
//! | Function          | GPIO | Advanced | Standard |
//! |-------------------|------|----------|----------|
//! | Bus data (SDA)    | 8    | yes      | yes      |
//! | Bus clock (SCL)   | 9    | yes      | yes      |
//! | I2S BCLK          | 41   | yes      | yes      |
//! | I2S LRCK          | 43   | yes      | yes      |
//! | I2S DOUT          | 42   | yes      | yes      |
//! | Headphone detect  | 17   | yes      | -        |
//! | Amplifier enable  | 46   | yes      | -        |

use crate::audio_types::I2cAddr;
use crate::gpio::{GpioNum, HardwarePins};

/// I2C addresses for bus peripherals.
///
/// All addresses are 7-bit (the embedded-hal standard convention).
pub struct I2cAddresses;

impl I2cAddresses {
    /// TCA8418 keyboard scanner. Only present on the advanced board.
    pub const TCA8418_KEYBOARD: I2cAddr = I2cAddr::new(0x34);

    /// ES8311 audio codec. Only present on the advanced board.
    pub const ES8311_CODEC: I2cAddr = I2cAddr::new(0x18);

    /// AW88298 smart amplifier. Only present on the standard board.
    pub const AW88298_AMP: I2cAddr = I2cAddr::new(0x36);

    /// AW9523 IO expander gating the AW88298 on the standard board.
    pub const AW9523_EXPANDER: I2cAddr = I2cAddr::new(0x58);
}

/// Bus clock rates in Hz.
pub struct BusClock;

impl BusClock {
    /// Idle / probing rate the bus is re-initialised at.
    pub const PROBE_HZ: u32 = 100_000;
    /// Fast-mode rate used for the keyboard probe and all register traffic.
    pub const FAST_HZ: u32 = 400_000;
    /// Transaction timeout configured on re-init.
    pub const TIMEOUT_MS: u64 = 50;
}

const BUS_DATA: GpioNum = GpioNum(8);
const BUS_CLOCK: GpioNum = GpioNum(9);
const I2S_BCLK: GpioNum = GpioNum(41);
const I2S_LRCK: GpioNum = GpioNum(43);
const I2S_DOUT: GpioNum = GpioNum(42);

/// Advanced board: ES8311 codec with headphone detect and amp enable.
pub const ADVANCED_PINS: HardwarePins = HardwarePins {
    bus_clock: Some(BUS_CLOCK),
    bus_data: Some(BUS_DATA),
    audio_clock: Some(I2S_BCLK),
    audio_frame_clock: Some(I2S_LRCK),
    audio_data: Some(I2S_DOUT),
    headphone_detect: Some(GpioNum(17)),
    amplifier_enable: Some(GpioNum(46)),
};

/// Standard board: AW88298 amplifier, gating is implicit.
pub const STANDARD_PINS: HardwarePins = HardwarePins {
    headphone_detect: None,
    amplifier_enable: None,
    ..ADVANCED_PINS
};
