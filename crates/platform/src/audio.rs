//! Audio output abstractions
//!
//! Two paths reach the speaker:
//! - [`Transport`]: the external decode/output engine that plays tracks.
//! - [`PcmOutput`]: the raw sample path, used once during bring-up for the
//!   self-test tone before the engine owns the serial link.

use crate::audio_types::Volume;
use crate::gpio::{GpioNum, HardwarePins};

/// Black-box decode/output engine.
///
/// The engine is driven by repeated [`step`](Transport::step) calls; each
/// call advances decoding and output by one buffer's worth.
pub trait Transport {
    /// Connect the engine to a source path. Returns `false` if the engine
    /// rejects it.
    fn open(&mut self, source: &str) -> impl core::future::Future<Output = bool>;

    /// Stop output and release the current source.
    fn stop(&mut self) -> impl core::future::Future<Output = ()>;

    /// Advance decode/output by one buffer.
    fn step(&mut self) -> impl core::future::Future<Output = ()>;

    /// `true` while the current source still has audio to produce.
    fn is_running(&self) -> bool;

    /// Set output gain.
    fn set_volume(&mut self, volume: Volume);

    /// Route the engine's serial output to the given pins.
    fn set_pinout(&mut self, pins: I2sPins);
}

/// Raw PCM sink for interleaved 16-bit samples.
pub trait PcmOutput {
    /// Error type
    type Error: core::fmt::Debug;

    /// Claim the serial peripheral with the given format and pins.
    fn start(
        &mut self,
        format: OutputFormat,
        pins: I2sPins,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Write interleaved samples, blocking until queued.
    fn write(
        &mut self,
        samples: &[i16],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Release the serial peripheral.
    fn release(&mut self) -> impl core::future::Future<Output = ()>;
}

/// PCM stream format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u8,
    /// Bit depth
    pub bit_depth: u8,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            bit_depth: 16,
        }
    }
}

/// The three I2S signals handed to an output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sPins {
    /// Bit clock
    pub bit_clock: GpioNum,
    /// Frame clock
    pub frame_clock: GpioNum,
    /// Serial data out
    pub data_out: GpioNum,
}

impl I2sPins {
    /// Extract the serial pins from a board pin map, if all are routed.
    pub fn from_pins(pins: &HardwarePins) -> Option<Self> {
        Some(Self {
            bit_clock: pins.audio_clock?,
            frame_clock: pins.audio_frame_clock?,
            data_out: pins.audio_data?,
        })
    }
}
