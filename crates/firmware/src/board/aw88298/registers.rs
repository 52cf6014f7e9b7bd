//! AW88298 amplifier and AW9523 expander registers used at bring-up.
//!
//! AW88298 registers are 16 bits wide, written big-endian after the
//! register address.

use platform::SampleRateHz;

/// AW88298 system control 2: boost and class-D enable.
pub const REG_SYSCTRL2: u8 = 0x61;
/// AW88298 system control: I2S enable, power up.
pub const REG_SYSCTRL: u8 = 0x04;
/// AW88298 system control 2: volume ramp, mute off.
pub const REG_SYSCTRL_MUTE: u8 = 0x05;
/// AW88298 I2S control: sample rate bucket and BCK mode.
pub const REG_I2SCTRL: u8 = 0x06;
/// AW88298 digital volume.
pub const REG_HAGCCFG: u8 = 0x0C;

/// AW9523 output port 0.
pub const AW9523_REG_OUTPUT0: u8 = 0x02;
/// AW9523 port 0 bit driving the amplifier enable.
pub const AW9523_AMP_ENABLE: u8 = 0b0000_0100;

/// Settle time after each write.
pub const WRITE_SETTLE_MS: u32 = 2;

/// One 16-bit register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordOp {
    /// Register address.
    pub register: u8,
    /// Value, sent big-endian.
    pub value: u16,
}

impl WordOp {
    /// Address byte followed by the big-endian value.
    pub fn frame(self) -> [u8; 3] {
        let [hi, lo] = self.value.to_be_bytes();
        [self.register, hi, lo]
    }
}

/// Rate bucket thresholds, ascending. Bucket `n` covers ratios up to
/// `RATE_TABLE[n]`.
pub const RATE_TABLE: [u32; 10] = [4, 5, 6, 8, 10, 11, 15, 20, 22, 44];

/// Upper bits of [`REG_I2SCTRL`]: BCK mode 16×2, I2S format.
pub const I2SCTRL_BASE: u16 = 0x14C0;

/// Bucket index for `rate`: the first whose threshold is not smaller than
/// `(rate + 1102) / 2205`, clamped to the last bucket.
pub fn rate_bucket(rate: SampleRateHz) -> u16 {
    let ratio = rate.get().saturating_add(1102).checked_div(2205).unwrap_or(0);
    let last = RATE_TABLE.len().saturating_sub(1);
    let index = RATE_TABLE
        .iter()
        .position(|&threshold| threshold >= ratio)
        .unwrap_or(last);
    u16::try_from(index).unwrap_or(0)
}

/// Value for [`REG_I2SCTRL`] at `rate`.
pub fn i2sctrl_value(rate: SampleRateHz) -> u16 {
    I2SCTRL_BASE | rate_bucket(rate)
}

/// Bring-up writes for `rate`, applied in order.
pub fn init_sequence(rate: SampleRateHz) -> [WordOp; 5] {
    [
        WordOp { register: REG_SYSCTRL2, value: 0x0673 },
        WordOp { register: REG_SYSCTRL, value: 0x4040 },
        WordOp { register: REG_SYSCTRL_MUTE, value: 0x0008 },
        WordOp { register: REG_I2SCTRL, value: i2sctrl_value(rate) },
        WordOp { register: REG_HAGCCFG, value: 0x0064 },
    ]
}
