//! Standard board: AW88298 smart amplifier, enabled through an AW9523 IO
//! expander.
//!
//! There is no headphone detect or amplifier enable GPIO; gating is done by
//! the expander bit. Bring-up succeeds if either the amplifier sequence or
//! the expander toggle went through.

pub mod registers;

use embedded_hal_async::delay::DelayNs;
use platform::board_config::{BusClock, I2cAddresses, STANDARD_PINS};
use platform::{HardwarePins, I2cConfig, I2cPeripheral, SampleRateHz};

use self::registers::{init_sequence, AW9523_AMP_ENABLE, AW9523_REG_OUTPUT0, WRITE_SETTLE_MS};
use super::{reinit_bus, AudioBoard, BoardVariant, BringupError};

/// Settle time after re-initialising the bus.
const REINIT_SETTLE_MS: u32 = 5;

/// The standard board's audio path.
#[derive(Debug, Clone, Copy)]
pub struct StandardBoard {
    sample_rate: SampleRateHz,
}

impl StandardBoard {
    /// Board whose amplifier is clocked for `sample_rate`.
    pub fn new(sample_rate: SampleRateHz) -> Self {
        Self { sample_rate }
    }

    /// Set the amplifier enable bit on the expander (read-modify-write).
    async fn enable_expander<B: I2cPeripheral>(bus: &mut B) -> Result<(), B::Error> {
        let address = I2cAddresses::AW9523_EXPANDER.get();
        let mut port = [0u8];
        bus.write_read(address, &[AW9523_REG_OUTPUT0], &mut port).await?;
        let [current] = port;
        bus.write(address, &[AW9523_REG_OUTPUT0, current | AW9523_AMP_ENABLE])
            .await
    }

    async fn program_amp<B, D>(&self, bus: &mut B, delay: &mut D) -> bool
    where
        B: I2cPeripheral,
        D: DelayNs,
    {
        let address = I2cAddresses::AW88298_AMP.get();
        let mut ok = true;
        for op in init_sequence(self.sample_rate) {
            match bus.write(address, &op.frame()).await {
                Ok(()) => delay.delay_ms(WRITE_SETTLE_MS).await,
                Err(e) => {
                    tracing::warn!(register = op.register, error = ?e, "AW88298 write failed");
                    ok = false;
                }
            }
        }
        ok
    }
}

impl Default for StandardBoard {
    fn default() -> Self {
        Self::new(SampleRateHz::CD)
    }
}

impl AudioBoard for StandardBoard {
    fn variant(&self) -> BoardVariant {
        BoardVariant::Standard
    }

    fn pinout(&self) -> HardwarePins {
        STANDARD_PINS
    }

    async fn bring_up<B, D>(&mut self, bus: &mut B, delay: &mut D) -> Result<(), BringupError>
    where
        B: I2cPeripheral,
        D: DelayNs,
    {
        tracing::info!(rate_hz = self.sample_rate.get(), "bringing up AW88298 amplifier");
        reinit_bus(bus, delay, REINIT_SETTLE_MS).await?;
        bus.configure(I2cConfig::at(BusClock::FAST_HZ))
            .map_err(|_| BringupError::BusConfig)?;

        let expander_ok = match Self::enable_expander(bus).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = ?e, "unable to toggle AW9523 output, continuing");
                false
            }
        };
        let amp_ok = self.program_amp(bus, delay).await;
        if !amp_ok {
            tracing::warn!("AW88298 initialisation reported errors, audio may be muted");
        }

        if amp_ok || expander_ok {
            Ok(())
        } else {
            Err(BringupError::AmplifierUnreachable)
        }
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
    use platform::mocks::{MockBus, MockDelay};

    const AW: u8 = 0x36;
    const EXP: u8 = 0x58;

    #[tokio::test]
    async fn test_full_sequence_with_expander() {
        let mut bus = MockBus::with_devices(&[AW, EXP]);
        bus.set_register(EXP, 0x02, 0b1000_0001);
        let mut delay = MockDelay::new();
        StandardBoard::default()
            .bring_up(&mut bus, &mut delay)
            .await
            .unwrap();

        let expander = bus.writes_to(EXP);
        assert_eq!(expander.len(), 1);
        assert_eq!(expander[0].data, [0x02, 0b1000_0101]);

        let amp: Vec<Vec<u8>> = bus.writes_to(AW).iter().map(|w| w.data.clone()).collect();
        assert_eq!(
            amp,
            [
                vec![0x61, 0x06, 0x73],
                vec![0x04, 0x40, 0x40],
                vec![0x05, 0x00, 0x08],
                vec![0x06, 0x14, 0xC7],
                vec![0x0C, 0x00, 0x64],
            ]
        );
        assert!(bus.writes_to(AW).iter().all(|w| w.frequency == BusClock::FAST_HZ));
        assert_eq!(delay.total_ms(), u64::from(REINIT_SETTLE_MS) + 5 * 2);
    }

    #[tokio::test]
    async fn test_missing_expander_is_not_fatal() {
        let mut bus = MockBus::with_devices(&[AW]);
        assert!(StandardBoard::default()
            .bring_up(&mut bus, &mut MockDelay::new())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_expander_alone_counts_as_success() {
        let mut bus = MockBus::with_devices(&[EXP]);
        assert!(StandardBoard::default()
            .bring_up(&mut bus, &mut MockDelay::new())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_nothing_answers() {
        let mut bus = MockBus::with_devices(&[]);
        let err = StandardBoard::default()
            .bring_up(&mut bus, &mut MockDelay::new())
            .await
            .unwrap_err();
        assert_eq!(err, BringupError::AmplifierUnreachable);
    }

    #[tokio::test]
    async fn test_partial_amp_failure_still_writes_rest() {
        let mut bus = MockBus::with_devices(&[AW]);
        bus.fail_register(AW, 0x05);
        let result = StandardBoard::default()
            .bring_up(&mut bus, &mut MockDelay::new())
            .await;
        assert_eq!(result, Err(BringupError::AmplifierUnreachable));
        assert_eq!(bus.writes_to(AW).len(), 4);
    }

    #[test]
    fn test_pinout_has_no_gating_pins() {
        let pins = StandardBoard::default().pinout();
        assert_eq!(pins.headphone_detect, None);
        assert_eq!(pins.amplifier_enable, None);
    }
}
