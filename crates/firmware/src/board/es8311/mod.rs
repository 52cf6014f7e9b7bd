//! Advanced board: ES8311 codec with a speaker amplifier enable pin and a
//! headphone detect input.
//!
//! Bring-up order (enforced with [`BringupSequencer`]):
//!   1. drive the amplifier enable low
//!   2. re-initialise the bus at 100 kHz, then write [`INIT_SEQUENCE`] at
//!      400 kHz with a 2 ms settle after every acknowledged write
//!   3. read headphone detect once: inserted keeps the amplifier off,
//!      otherwise it is enabled
//!   4. play the self-test tone through the raw PCM path
//!
//! A write that is not acknowledged fails the sequence, but the remaining
//! writes are still issued. The amplifier then stays low and steps 3 and 4
//! are skipped.

pub mod registers;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use platform::audio_sequencer::BringupSequencer;
use platform::board_config::{BusClock, I2cAddresses, ADVANCED_PINS};
use platform::{HardwarePins, I2cConfig, I2cPeripheral, PcmOutput};

use self::registers::{INIT_SEQUENCE, WRITE_SETTLE_MS};
use super::{reinit_bus, AudioBoard, BoardVariant, BringupError};
use crate::audio::amp::AmpDriver;
use crate::audio::headphone::HeadphoneMonitor;
use crate::audio::tone::{play_test_tone, TestTone, ToneOutcome};

/// Settle time after re-initialising the bus.
const REINIT_SETTLE_MS: u32 = 10;

/// The advanced board's audio path.
pub struct AdvancedBoard<A, H, P> {
    amp: A,
    detect: H,
    pcm: P,
    headphones: Option<bool>,
}

impl<A, H, P> AdvancedBoard<A, H, P>
where
    A: AmpDriver,
    H: InputPin,
    P: PcmOutput,
{
    /// Board using `amp` for the speaker enable, `detect` for the jack
    /// (active low) and `pcm` for the self-test tone.
    pub fn new(amp: A, detect: H, pcm: P) -> Self {
        Self {
            amp,
            detect,
            pcm,
            headphones: None,
        }
    }

    /// Jack state read during the last successful bring-up.
    pub fn headphones_at_boot(&self) -> Option<bool> {
        self.headphones
    }

    /// The amplifier driver.
    pub fn amp(&self) -> &A {
        &self.amp
    }

    /// The raw PCM path.
    pub fn pcm(&self) -> &P {
        &self.pcm
    }

    /// Hand the amplifier and detect pin to a monitor seeded with the jack
    /// state seen at bring-up.
    pub fn into_headphone_monitor(self) -> HeadphoneMonitor<A, H> {
        HeadphoneMonitor::new(self.amp, self.detect, self.headphones.unwrap_or(false))
    }

    async fn program_codec<B, D>(&mut self, bus: &mut B, delay: &mut D) -> Result<(), BringupError>
    where
        B: I2cPeripheral,
        D: DelayNs,
    {
        bus.configure(I2cConfig::at(BusClock::FAST_HZ))
            .map_err(|_| BringupError::BusConfig)?;
        let address = I2cAddresses::ES8311_CODEC.get();
        let mut first_failure = None;
        for op in &INIT_SEQUENCE {
            match bus.write(address, &[op.register, op.value]).await {
                Ok(()) => delay.delay_ms(WRITE_SETTLE_MS).await,
                Err(e) => {
                    tracing::warn!(register = op.register, error = ?e, "codec write failed");
                    first_failure.get_or_insert(op.register);
                }
            }
        }
        match first_failure {
            Some(register) => Err(BringupError::RegisterWrite { register }),
            None => Ok(()),
        }
    }

    async fn gate_amp(&mut self) -> Result<bool, BringupError> {
        let inserted = self.detect.is_low().map_err(|_| BringupError::DetectPin)?;
        if inserted {
            tracing::info!("headphones detected, speaker amplifier stays off");
            self.amp.disable().await.map_err(|_| BringupError::AmpPin)?;
        } else {
            tracing::info!("no headphones, speaker amplifier on");
            self.amp.enable().await.map_err(|_| BringupError::AmpPin)?;
        }
        Ok(inserted)
    }
}

impl<A, H, P> AudioBoard for AdvancedBoard<A, H, P>
where
    A: AmpDriver,
    H: InputPin,
    P: PcmOutput,
{
    fn variant(&self) -> BoardVariant {
        BoardVariant::Advanced
    }

    fn pinout(&self) -> HardwarePins {
        ADVANCED_PINS
    }

    async fn bring_up<B, D>(&mut self, bus: &mut B, delay: &mut D) -> Result<(), BringupError>
    where
        B: I2cPeripheral,
        D: DelayNs,
    {
        tracing::info!("bringing up ES8311 codec");
        self.headphones = None;
        self.amp.disable().await.map_err(|_| BringupError::AmpPin)?;
        let sequencer = BringupSequencer::new();

        reinit_bus(bus, delay, REINIT_SETTLE_MS).await?;
        if let Err(e) = self.program_codec(bus, delay).await {
            tracing::warn!(error = %e, "ES8311 init sequence failed, amplifier held low");
            return Err(e);
        }
        let sequencer = sequencer.program_codec();

        let inserted = self.gate_amp().await?;
        self.headphones = Some(inserted);
        let sequencer = sequencer.gate_amp();

        let pins = self.pinout();
        let _ready = match play_test_tone(&mut self.pcm, &pins, &TestTone::BOOT).await {
            Ok(ToneOutcome::Played { buffers }) => {
                tracing::info!(buffers, "test tone done");
                sequencer.tone_played()
            }
            Ok(ToneOutcome::Skipped) => {
                tracing::warn!("test tone skipped: audio pins not configured");
                sequencer.tone_skipped()
            }
            Err(e) => {
                tracing::warn!(error = ?e, "test tone failed");
                sequencer.tone_skipped()
            }
        };
        tracing::info!("ES8311 ready");
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use crate::audio::amp::MockAmp;
    use platform::mocks::{MockBus, MockDelay, MockPcmOutput, MockPin};
    use platform::PinState;

    const ES: u8 = 0x18;

    fn board(jack: PinState) -> AdvancedBoard<MockAmp, MockPin, MockPcmOutput> {
        AdvancedBoard::new(MockAmp::new(), MockPin::new(jack), MockPcmOutput::new())
    }

    #[tokio::test]
    async fn test_clean_sequence_enables_amp_without_headphones() {
        let mut bus = MockBus::with_devices(&[ES]);
        let mut delay = MockDelay::new();
        let mut b = board(PinState::High);
        b.bring_up(&mut bus, &mut delay).await.unwrap();

        let writes = bus.writes_to(ES);
        assert_eq!(writes.len(), INIT_SEQUENCE.len());
        for (w, op) in writes.iter().zip(INIT_SEQUENCE.iter()) {
            assert_eq!(w.data, [op.register, op.value]);
            assert_eq!(w.frequency, BusClock::FAST_HZ);
        }
        assert!(b.amp().is_enabled());
        assert_eq!(b.headphones_at_boot(), Some(false));
        assert_eq!(b.pcm().releases, 1);
    }

    #[tokio::test]
    async fn test_headphones_keep_amp_off() {
        let mut bus = MockBus::with_devices(&[ES]);
        let mut b = board(PinState::Low);
        b.bring_up(&mut bus, &mut MockDelay::new()).await.unwrap();
        assert!(!b.amp().is_enabled());
        assert_eq!(b.amp().enable_count, 0);
        assert_eq!(b.headphones_at_boot(), Some(true));
    }

    #[tokio::test]
    async fn test_failed_write_continues_then_fails_with_amp_low() {
        let mut bus = MockBus::with_devices(&[ES]);
        bus.fail_register(ES, 0x0D);
        let mut b = board(PinState::High);
        let err = b.bring_up(&mut bus, &mut MockDelay::new()).await.unwrap_err();

        assert_eq!(err, BringupError::RegisterWrite { register: 0x0D });
        // Every other write still went out.
        assert_eq!(bus.writes_to(ES).len(), INIT_SEQUENCE.len() - 1);
        assert!(!b.amp().is_enabled());
        assert_eq!(b.amp().enable_count, 0);
        assert_eq!(b.pcm().releases, 0);
        assert_eq!(b.headphones_at_boot(), None);
    }

    #[tokio::test]
    async fn test_settle_only_after_acknowledged_writes() {
        let mut bus = MockBus::with_devices(&[ES]);
        bus.fail_register(ES, 0x00);
        bus.fail_register(ES, 0x37);
        let mut delay = MockDelay::new();
        let _ = board(PinState::High).bring_up(&mut bus, &mut delay).await;
        let settles = u64::from(WRITE_SETTLE_MS) * (INIT_SEQUENCE.len() as u64 - 2);
        assert_eq!(delay.total_ms(), u64::from(REINIT_SETTLE_MS) + settles);
    }

    #[tokio::test]
    async fn test_absent_codec_fails_on_first_register() {
        let mut bus = MockBus::with_devices(&[]);
        let err = board(PinState::High)
            .bring_up(&mut bus, &mut MockDelay::new())
            .await
            .unwrap_err();
        assert_eq!(err, BringupError::RegisterWrite { register: 0x00 });
    }

    #[tokio::test]
    async fn test_pcm_start_failure_does_not_fail_bring_up() {
        let mut bus = MockBus::with_devices(&[ES]);
        let mut pcm = MockPcmOutput::new();
        pcm.fail_start = true;
        let mut b = AdvancedBoard::new(MockAmp::new(), MockPin::new(PinState::High), pcm);
        assert!(b.bring_up(&mut bus, &mut MockDelay::new()).await.is_ok());
    }
}
