//! Self-test tone played once after the advanced board comes up.
//!
//! Goes straight to the raw PCM path; the transport has not claimed the
//! serial link yet.

use core::f32::consts::TAU;

use platform::{HardwarePins, I2sPins, OutputFormat, PcmOutput};

/// Stereo frames per written buffer.
const FRAMES_PER_BUFFER: usize = 256;

/// Chunk length used when the computed one rounds to zero.
const FALLBACK_CHUNK_MS: u32 = 6;

/// Sine burst parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestTone {
    /// Pitch in Hz.
    pub freq_hz: f32,
    /// Length of the burst.
    pub duration_ms: u32,
    /// Output sample rate.
    pub sample_rate: u32,
    /// Peak sample value.
    pub amplitude: i16,
}

impl TestTone {
    /// Boot confirmation beep.
    pub const BOOT: Self = Self {
        freq_hz: 440.0,
        duration_ms: 1_500,
        sample_rate: 44_100,
        amplitude: 12_000,
    };

    /// Playing time of one buffer, in whole milliseconds.
    pub fn chunk_ms(&self) -> u32 {
        let frames = u32::try_from(FRAMES_PER_BUFFER).unwrap_or(u32::MAX);
        match 1_000u32.saturating_mul(frames).checked_div(self.sample_rate) {
            Some(0) | None => FALLBACK_CHUNK_MS,
            Some(ms) => ms,
        }
    }

    /// Buffers written for the whole burst.
    pub fn buffer_count(&self) -> u32 {
        self.duration_ms.div_ceil(self.chunk_ms())
    }
}

/// What [`play_test_tone`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneOutcome {
    /// The burst went out in `buffers` writes.
    Played {
        /// Buffers written.
        buffers: u32,
    },
    /// A serial pin is not routed on this board.
    Skipped,
}

/// Play `tone` on the pins of `pins`.
///
/// The output is released afterwards, also when a write fails.
pub async fn play_test_tone<P: PcmOutput>(
    pcm: &mut P,
    pins: &HardwarePins,
    tone: &TestTone,
) -> Result<ToneOutcome, P::Error> {
    let Some(serial) = I2sPins::from_pins(pins) else {
        return Ok(ToneOutcome::Skipped);
    };
    let format = OutputFormat {
        sample_rate: tone.sample_rate,
        ..OutputFormat::default()
    };
    pcm.start(format, serial).await?;
    tracing::debug!(freq_hz = tone.freq_hz, duration_ms = tone.duration_ms, "test tone");

    let written = write_burst(pcm, tone).await;
    pcm.release().await;
    written.map(|buffers| ToneOutcome::Played { buffers })
}

#[allow(clippy::large_stack_arrays)] // one 1 KiB buffer, reused
#[allow(clippy::arithmetic_side_effects)] // f32 phase accumulation
async fn write_burst<P: PcmOutput>(pcm: &mut P, tone: &TestTone) -> Result<u32, P::Error> {
    #[allow(clippy::cast_precision_loss)] // audio rates are far below 2^24
    let step = TAU * tone.freq_hz / tone.sample_rate.max(1) as f32;
    let amplitude = f32::from(tone.amplitude);
    let mut phase = 0.0f32;
    let mut buffer = [0i16; FRAMES_PER_BUFFER * 2];

    let count = tone.buffer_count();
    for _ in 0..count {
        for frame in buffer.chunks_exact_mut(2) {
            #[allow(clippy::cast_possible_truncation)] // |sin| <= 1 keeps it in i16
            let sample = (libm::sinf(phase) * amplitude) as i16;
            frame.fill(sample);
            phase += step;
            if phase >= TAU {
                phase -= TAU;
            }
        }
        pcm.write(&buffer).await?;
    }
    Ok(count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::board_config::ADVANCED_PINS;
    use platform::mocks::MockPcmOutput;

    #[test]
    fn test_boot_tone_is_three_hundred_buffers() {
        assert_eq!(TestTone::BOOT.chunk_ms(), 5);
        assert_eq!(TestTone::BOOT.buffer_count(), 300);
    }

    #[test]
    fn test_zero_chunk_falls_back() {
        let tone = TestTone {
            sample_rate: 512_000,
            ..TestTone::BOOT
        };
        assert_eq!(tone.chunk_ms(), FALLBACK_CHUNK_MS);
        assert_eq!(tone.buffer_count(), 250);
    }

    #[tokio::test]
    async fn test_plays_full_burst_and_releases() {
        let mut pcm = MockPcmOutput::new();
        let outcome = play_test_tone(&mut pcm, &ADVANCED_PINS, &TestTone::BOOT)
            .await
            .unwrap();
        assert_eq!(outcome, ToneOutcome::Played { buffers: 300 });
        assert_eq!(pcm.writes, 300);
        assert_eq!(pcm.samples_written, 300 * FRAMES_PER_BUFFER * 2);
        assert_eq!(pcm.releases, 1);
        assert!(pcm.started.is_none());
    }

    #[tokio::test]
    async fn test_missing_pin_skips_without_claiming_output() {
        let pins = HardwarePins {
            audio_data: None,
            ..ADVANCED_PINS
        };
        let mut pcm = MockPcmOutput::new();
        let outcome = play_test_tone(&mut pcm, &pins, &TestTone::BOOT).await.unwrap();
        assert_eq!(outcome, ToneOutcome::Skipped);
        assert_eq!(pcm.writes, 0);
        assert_eq!(pcm.releases, 0);
    }

    #[tokio::test]
    async fn test_start_failure_is_reported() {
        let mut pcm = MockPcmOutput::new();
        pcm.fail_start = true;
        assert!(play_test_tone(&mut pcm, &ADVANCED_PINS, &TestTone::BOOT)
            .await
            .is_err());
        assert_eq!(pcm.writes, 0);
    }
}
