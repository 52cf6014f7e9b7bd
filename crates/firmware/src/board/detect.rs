//! Variant detection over bus presence probes.
//!
//! Priority order, first hit wins:
//!
//! | # | Device             | Address | Clock   | Implies  |
//! |---|--------------------|---------|---------|----------|
//! | 1 | TCA8418 keyboard   | 0x34    | 400 kHz | Advanced |
//! | 2 | ES8311 codec       | 0x18    | 400 kHz | Advanced |
//! | 3 | AW88298 amplifier  | 0x36    | 400 kHz | Standard |
//!
//! No hit yields [`BoardVariant::Unknown`]; bring-up then tries the advanced
//! path first.

use embedded_hal_async::delay::DelayNs;
use platform::board_config::{BusClock, I2cAddresses};
use platform::{probe, scan, I2cPeripheral};

use super::{reinit_bus, BoardHint, BoardVariant, KeyboardDriver};

/// Settle time after re-initialising the bus for detection.
const DETECT_SETTLE_MS: u32 = 5;

/// Classify the attached hardware.
///
/// An unambiguous `hint` is trusted without touching the bus. Otherwise the
/// bus is re-initialised at the probing clock, scanned once for the log,
/// probed in priority order, and left at the probing clock.
pub async fn detect<B, D>(bus: &mut B, delay: &mut D, hint: BoardHint) -> BoardVariant
where
    B: I2cPeripheral,
    D: DelayNs,
{
    match hint {
        BoardHint::Advanced => {
            tracing::info!("board identifies as advanced");
            return BoardVariant::Advanced;
        }
        BoardHint::Standard => {
            tracing::info!("board identifies as standard");
            return BoardVariant::Standard;
        }
        BoardHint::Other => {}
    }

    if reinit_bus(bus, delay, DETECT_SETTLE_MS).await.is_err() {
        tracing::warn!("bus refused re-init, detection inconclusive");
        return BoardVariant::Unknown;
    }

    let found = scan(bus, BusClock::PROBE_HZ).await;
    tracing::info!(devices = found.len(), "bus scan");
    for address in &found {
        tracing::debug!(address = *address, "bus device");
    }

    let variant = classify(bus).await;
    if let Err(e) = bus.configure(platform::I2cConfig::at(BusClock::PROBE_HZ)) {
        tracing::warn!(error = ?e, "bus refused probe clock after detection");
    }

    match variant {
        BoardVariant::Unknown => {
            tracing::warn!("variant detection inconclusive, will try advanced path first");
        }
        v => tracing::info!(variant = v.name(), "variant detected"),
    }
    variant
}

async fn classify<B: I2cPeripheral>(bus: &mut B) -> BoardVariant {
    if probe(bus, I2cAddresses::TCA8418_KEYBOARD.get(), BusClock::FAST_HZ).await.present {
        tracing::info!("keyboard controller present");
        return BoardVariant::Advanced;
    }
    if probe(bus, I2cAddresses::ES8311_CODEC.get(), BusClock::FAST_HZ).await.present {
        tracing::info!("codec present");
        return BoardVariant::Advanced;
    }
    if probe(bus, I2cAddresses::AW88298_AMP.get(), BusClock::FAST_HZ).await.present {
        tracing::info!("amplifier present");
        return BoardVariant::Standard;
    }
    BoardVariant::Unknown
}

/// Choose the keyboard backend.
///
/// A known variant decides directly. For [`BoardVariant::Unknown`] the hint
/// decides, then fresh probes (controller or codec → TCA8418, amplifier →
/// matrix); with no evidence at all the matrix driver is used.
pub async fn keyboard_driver<B: I2cPeripheral>(
    bus: &mut B,
    variant: BoardVariant,
    hint: BoardHint,
) -> KeyboardDriver {
    let driver = match (variant, hint) {
        (BoardVariant::Advanced, _) | (BoardVariant::Unknown, BoardHint::Advanced) => {
            KeyboardDriver::Tca8418
        }
        (BoardVariant::Standard, _) | (BoardVariant::Unknown, BoardHint::Standard) => {
            KeyboardDriver::Matrix
        }
        (BoardVariant::Unknown, BoardHint::Other) => match classify(bus).await {
            BoardVariant::Advanced => KeyboardDriver::Tca8418,
            BoardVariant::Standard | BoardVariant::Unknown => KeyboardDriver::Matrix,
        },
    };
    tracing::info!(
        driver = match driver {
            KeyboardDriver::Matrix => "matrix",
            KeyboardDriver::Tca8418 => "tca8418",
        },
        "keyboard driver selected"
    );
    driver
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

    const TCA: u8 = 0x34;
    const ES: u8 = 0x18;
    const AW: u8 = 0x36;

    fn priority_probes(bus: &MockBus) -> Vec<u8> {
        bus.probes
            .iter()
            .filter(|&&(_, hz)| hz == BusClock::FAST_HZ)
            .map(|&(a, _)| a)
            .collect()
    }

    #[tokio::test]
    async fn test_keyboard_controller_means_advanced() {
        let mut bus = MockBus::with_devices(&[TCA]);
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Other).await;
        assert_eq!(v, BoardVariant::Advanced);
        assert_eq!(priority_probes(&bus), [TCA]);
    }

    #[tokio::test]
    async fn test_codec_alone_means_advanced() {
        let mut bus = MockBus::with_devices(&[ES]);
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Other).await;
        assert_eq!(v, BoardVariant::Advanced);
        assert_eq!(priority_probes(&bus), [TCA, ES]);
    }

    #[tokio::test]
    async fn test_amplifier_alone_means_standard() {
        let mut bus = MockBus::with_devices(&[AW, 0x58]);
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Other).await;
        assert_eq!(v, BoardVariant::Standard);
        assert_eq!(priority_probes(&bus), [TCA, ES, AW]);
    }

    #[tokio::test]
    async fn test_advanced_signal_beats_amplifier() {
        let mut bus = MockBus::with_devices(&[AW, ES]);
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Other).await;
        assert_eq!(v, BoardVariant::Advanced);
    }

    #[tokio::test]
    async fn test_empty_bus_is_unknown_and_left_at_probe_clock() {
        let mut bus = MockBus::with_devices(&[]);
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Other).await;
        assert_eq!(v, BoardVariant::Unknown);
        assert_eq!(bus.frequency, BusClock::PROBE_HZ);
    }

    #[tokio::test]
    async fn test_hint_skips_the_bus() {
        let mut bus = MockBus::with_devices(&[AW]);
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Advanced).await;
        assert_eq!(v, BoardVariant::Advanced);
        assert!(bus.probes.is_empty());
        assert_eq!(bus.configure_count, 0);
    }

    #[tokio::test]
    async fn test_refused_reinit_is_unknown() {
        let mut bus = MockBus::with_devices(&[TCA]);
        bus.refuse_configure = true;
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Other).await;
        assert_eq!(v, BoardVariant::Unknown);
    }

    #[tokio::test]
    async fn test_refused_final_clock_reset_keeps_variant() {
        let mut control = MockBus::with_devices(&[AW]);
        detect(&mut control, &mut MockDelay::new(), BoardHint::Other).await;

        let mut bus = MockBus::with_devices(&[AW]);
        bus.configure_limit = Some(control.configure_count - 1);
        let v = detect(&mut bus, &mut MockDelay::new(), BoardHint::Other).await;
        assert_eq!(v, BoardVariant::Standard);
        assert_eq!(priority_probes(&bus), [TCA, ES, AW]);
        assert_eq!(bus.configure_count, control.configure_count - 1);
        assert_eq!(bus.frequency, BusClock::FAST_HZ);
    }

    #[tokio::test]
    async fn test_detection_is_deterministic() {
        for devices in [&[][..], &[TCA][..], &[ES][..], &[AW][..], &[AW, TCA][..]] {
            let mut a = MockBus::with_devices(devices);
            let mut b = MockBus::with_devices(devices);
            let va = detect(&mut a, &mut MockDelay::new(), BoardHint::Other).await;
            let vb = detect(&mut b, &mut MockDelay::new(), BoardHint::Other).await;
            assert_eq!(va, vb);
        }
    }

    #[tokio::test]
    async fn test_keyboard_follows_known_variant() {
        let mut bus = MockBus::with_devices(&[AW]);
        let k = keyboard_driver(&mut bus, BoardVariant::Advanced, BoardHint::Standard).await;
        assert_eq!(k, KeyboardDriver::Tca8418);
        let k = keyboard_driver(&mut bus, BoardVariant::Standard, BoardHint::Advanced).await;
        assert_eq!(k, KeyboardDriver::Matrix);
        assert!(bus.probes.is_empty());
    }

    #[tokio::test]
    async fn test_keyboard_for_unknown_uses_hint_then_probes() {
        let mut bus = MockBus::with_devices(&[ES]);
        let k = keyboard_driver(&mut bus, BoardVariant::Unknown, BoardHint::Standard).await;
        assert_eq!(k, KeyboardDriver::Matrix);
        let k = keyboard_driver(&mut bus, BoardVariant::Unknown, BoardHint::Other).await;
        assert_eq!(k, KeyboardDriver::Tca8418);

        let mut empty = MockBus::with_devices(&[]);
        let k = keyboard_driver(&mut empty, BoardVariant::Unknown, BoardHint::Other).await;
        assert_eq!(k, KeyboardDriver::Matrix);
    }
}
