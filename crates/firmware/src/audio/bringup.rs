//! Codec bring-up with a single fallback.
//!
//! The detected variant's board goes first (`Unknown` counts as advanced).
//! If it fails the other board is tried once; the variant reported is the
//! last one attempted. A failed pair is not fatal: the transport simply
//! stays unconfigured and `codec_ready` is false.

use embedded_hal_async::delay::DelayNs;
use platform::{I2cPeripheral, I2sPins, Transport, Volume};

use crate::board::{AudioBoard, BoardVariant, BringupError};

/// Result of [`CodecBringup::bring_up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringupOutcome {
    /// Variant the hardware was last brought up as.
    pub variant: BoardVariant,
    /// The transport may be driven.
    pub codec_ready: bool,
}

/// Runs board bring-up over a borrowed bus and delay.
pub struct CodecBringup<'a, B, D> {
    bus: &'a mut B,
    delay: &'a mut D,
}

impl<'a, B, D> CodecBringup<'a, B, D>
where
    B: I2cPeripheral,
    D: DelayNs,
{
    /// Bring-up driving `bus`, settling with `delay`.
    pub fn new(bus: &'a mut B, delay: &'a mut D) -> Self {
        Self { bus, delay }
    }

    /// Bring up `variant`, falling back to the other board once.
    ///
    /// On success the board's serial pinout and the default volume are
    /// handed to `transport`.
    pub async fn bring_up<A, S, T>(
        &mut self,
        variant: BoardVariant,
        advanced: &mut A,
        standard: &mut S,
        transport: &mut T,
    ) -> BringupOutcome
    where
        A: AudioBoard,
        S: AudioBoard,
        T: Transport,
    {
        let order = match variant {
            BoardVariant::Standard => [BoardVariant::Standard, BoardVariant::Advanced],
            BoardVariant::Advanced | BoardVariant::Unknown => {
                [BoardVariant::Advanced, BoardVariant::Standard]
            }
        };

        let mut attempted = variant;
        for (attempt, candidate) in order.into_iter().enumerate() {
            if attempt > 0 {
                tracing::warn!(variant = candidate.name(), "falling back");
            }
            attempted = candidate;
            let (result, pins) = match candidate {
                BoardVariant::Standard => {
                    (standard.bring_up(&mut *self.bus, &mut *self.delay).await, standard.pinout())
                }
                BoardVariant::Advanced | BoardVariant::Unknown => {
                    (advanced.bring_up(&mut *self.bus, &mut *self.delay).await, advanced.pinout())
                }
            };
            match result {
                Ok(()) => {
                    match I2sPins::from_pins(&pins) {
                        Some(serial) => transport.set_pinout(serial),
                        None => tracing::warn!("board routes no audio serial pins"),
                    }
                    transport.set_volume(Volume::default());
                    tracing::info!(variant = candidate.name(), "codec ready");
                    return BringupOutcome {
                        variant: candidate,
                        codec_ready: true,
                    };
                }
                Err(e) => log_failure(candidate, e),
            }
        }

        tracing::error!("audio bring-up failed, playback disabled");
        BringupOutcome {
            variant: attempted,
            codec_ready: false,
        }
    }
}

fn log_failure(variant: BoardVariant, error: BringupError) {
    tracing::warn!(variant = variant.name(), error = %error, "bring-up failed");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::audio::amp::MockAmp;
    use crate::board::{AdvancedBoard, StandardBoard};
    use platform::board_config::ADVANCED_PINS;
    use platform::mocks::{MockBus, MockDelay, MockPcmOutput, MockPin, MockTransport};
    use platform::PinState;

    type Advanced = AdvancedBoard<MockAmp, MockPin, MockPcmOutput>;

    fn advanced() -> Advanced {
        AdvancedBoard::new(MockAmp::new(), MockPin::new(PinState::High), MockPcmOutput::new())
    }

    async fn run(devices: &[u8], variant: BoardVariant) -> (BringupOutcome, MockBus, MockTransport) {
        let mut bus = MockBus::with_devices(devices);
        let mut delay = MockDelay::new();
        let mut transport = MockTransport::default();
        let outcome = CodecBringup::new(&mut bus, &mut delay)
            .bring_up(variant, &mut advanced(), &mut StandardBoard::default(), &mut transport)
            .await;
        (outcome, bus, transport)
    }

    #[tokio::test]
    async fn test_advanced_success_configures_transport() {
        let (outcome, _, transport) = run(&[0x18], BoardVariant::Advanced).await;
        assert_eq!(
            outcome,
            BringupOutcome {
                variant: BoardVariant::Advanced,
                codec_ready: true
            }
        );
        assert_eq!(transport.pinout, I2sPins::from_pins(&ADVANCED_PINS));
        assert_eq!(transport.volume, Some(Volume::default()));
    }

    #[tokio::test]
    async fn test_unknown_tries_advanced_first() {
        let (outcome, bus, _) = run(&[0x36], BoardVariant::Unknown).await;
        assert_eq!(outcome.variant, BoardVariant::Standard);
        assert!(outcome.codec_ready);
        // Advanced: re-init + fast clock, then the same for standard.
        assert_eq!(bus.configure_count, 4);
    }

    #[tokio::test]
    async fn test_standard_first_when_detected() {
        let (outcome, bus, _) = run(&[0x36, 0x18], BoardVariant::Standard).await;
        assert_eq!(outcome.variant, BoardVariant::Standard);
        assert!(bus.writes_to(0x18).is_empty());
    }

    #[tokio::test]
    async fn test_both_fail_leaves_transport_untouched() {
        let (outcome, bus, transport) = run(&[], BoardVariant::Unknown).await;
        assert_eq!(
            outcome,
            BringupOutcome {
                variant: BoardVariant::Standard,
                codec_ready: false
            }
        );
        assert_eq!(bus.configure_count, 4);
        assert_eq!(transport.pinout, None);
        assert_eq!(transport.volume, None);
    }
}
