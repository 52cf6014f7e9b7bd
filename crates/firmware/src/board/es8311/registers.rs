//! ES8311 register programming used at bring-up.
//!
//! Only the eight writes needed to bring the codec out of reset as an I2S
//! slave with the DAC path routed to the output are listed. The serial link
//! is driven by the SoC; the codec derives its clocks from BCLK.

use crate::board::RegisterOp;

/// Reset / clock manager: release reset, slave mode.
pub const REG_RESET: u8 = 0x00;
/// Clock manager 1: enable MCLK-from-BCLK and the DAC clocks.
pub const REG_CLK_MANAGER1: u8 = 0x01;
/// Clock manager 2: pre-divider and multiplier.
pub const REG_CLK_MANAGER2: u8 = 0x02;
/// System power: analog blocks up.
pub const REG_SYSTEM_POWER: u8 = 0x0D;
/// System: DAC power.
pub const REG_SYSTEM_DAC: u8 = 0x12;
/// System: output driver enable.
pub const REG_SYSTEM_OUTPUT: u8 = 0x13;
/// DAC digital volume.
pub const REG_DAC_VOLUME: u8 = 0x32;
/// DAC ramp / equaliser bypass.
pub const REG_DAC_RAMP: u8 = 0x37;

/// Settle time after each acknowledged write.
pub const WRITE_SETTLE_MS: u32 = 2;

/// Bring-up writes, applied in order.
pub const INIT_SEQUENCE: [RegisterOp; 8] = [
    RegisterOp { register: REG_RESET, value: 0x80 },
    RegisterOp { register: REG_CLK_MANAGER1, value: 0xB5 },
    RegisterOp { register: REG_CLK_MANAGER2, value: 0x18 },
    RegisterOp { register: REG_SYSTEM_POWER, value: 0x01 },
    RegisterOp { register: REG_SYSTEM_DAC, value: 0x00 },
    RegisterOp { register: REG_SYSTEM_OUTPUT, value: 0x10 },
    RegisterOp { register: REG_DAC_VOLUME, value: 0xBF },
    RegisterOp { register: REG_DAC_RAMP, value: 0x08 },
];
