//! Integration test: complete boot sequences against simulated buses.
//!
//! Tests that:
//!   1. detection follows the keyboard → codec → amplifier priority
//!   2. bring-up falls back exactly once, never trying a third path
//!   3. the advanced board gates the amplifier from the headphone jack
//!   4. the standard board programs the rate-dependent I2S register
//!   5. a missing storage medium halts boot before bring-up
//!
//! Does NOT require physical hardware.
//!
//! Run with: cargo test -p firmware --test integration_boot_sequence

// Integration test file -- intentional test patterns permitted.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
)]

use firmware::audio::{AmpDriver, CodecBringup, MockAmp};
use firmware::board::{detect, AdvancedBoard, BoardHint, BoardVariant, KeyboardDriver, StandardBoard};
use firmware::boot::{boot, BootError, BootReport, Boards};
use platform::board_config::{BusClock, STANDARD_PINS};
use platform::mocks::{MockBus, MockDelay, MockPcmOutput, MockPin, MockStorage, MockTransport};
use platform::{I2sPins, PinState, SampleRateHz};

const TCA: u8 = 0x34;
const ES: u8 = 0x18;
const AW: u8 = 0x36;
const EXP: u8 = 0x58;

type Advanced = AdvancedBoard<MockAmp, MockPin, MockPcmOutput>;

fn advanced(jack: PinState) -> Advanced {
    AdvancedBoard::new(MockAmp::new(), MockPin::new(jack), MockPcmOutput::new())
}

/// Bus transactions to the codec and amplifier, in order.
fn chip_traffic(bus: &MockBus) -> Vec<u8> {
    bus.writes
        .iter()
        .map(|w| w.address)
        .filter(|a| *a == ES || *a == AW)
        .collect()
}

#[tokio::test]
async fn test_no_devices_detects_unknown_then_tries_advanced_first() {
    let mut bus = MockBus::with_devices(&[]);
    let mut delay = MockDelay::new();
    let variant = detect(&mut bus, &mut delay, BoardHint::Other).await;
    assert_eq!(variant, BoardVariant::Unknown);

    let mut adv = advanced(PinState::High);
    let mut std_board = StandardBoard::default();
    let mut transport = MockTransport::default();
    let outcome = CodecBringup::new(&mut bus, &mut delay)
        .bring_up(variant, &mut adv, &mut std_board, &mut transport)
        .await;

    // Amplifier held low before anything else; no third attempt.
    assert!(!adv.amp().is_enabled());
    assert_eq!(adv.amp().disable_count, 1);
    assert_eq!(outcome.variant, BoardVariant::Standard);
    assert!(!outcome.codec_ready);
}

#[tokio::test]
async fn test_advanced_failure_lands_on_standard_with_its_own_outcome() {
    // The codec answers probes but refuses every register write.
    let mut bus = MockBus::with_devices(&[ES, AW, EXP]);
    bus.fail_all_writes(ES);
    let mut delay = MockDelay::new();
    let mut adv = advanced(PinState::High);
    let mut std_board = StandardBoard::default();
    let mut transport = MockTransport::default();

    let variant = detect(&mut bus, &mut delay, BoardHint::Other).await;
    assert_eq!(variant, BoardVariant::Advanced);
    let outcome = CodecBringup::new(&mut bus, &mut delay)
        .bring_up(variant, &mut adv, &mut std_board, &mut transport)
        .await;

    assert_eq!(outcome.variant, BoardVariant::Standard);
    assert!(outcome.codec_ready);
    assert!(chip_traffic(&bus).iter().all(|a| *a == AW));
    assert_eq!(bus.writes_to(AW).len(), 5);
    assert_eq!(transport.pinout, I2sPins::from_pins(&STANDARD_PINS));
    assert!(!adv.amp().is_enabled());
}

#[tokio::test]
async fn test_standard_failure_falls_back_to_advanced_once() {
    let mut bus = MockBus::with_devices(&[ES]);
    let mut delay = MockDelay::new();
    let mut adv = advanced(PinState::High);
    let mut transport = MockTransport::default();
    let outcome = CodecBringup::new(&mut bus, &mut delay)
        .bring_up(
            BoardVariant::Standard,
            &mut adv,
            &mut StandardBoard::default(),
            &mut transport,
        )
        .await;

    assert_eq!(outcome.variant, BoardVariant::Advanced);
    assert!(outcome.codec_ready);
    assert!(adv.amp().is_enabled());
    assert_eq!(bus.writes_to(ES).len(), 8);
}

#[tokio::test]
async fn test_headphones_at_boot_keep_speaker_off() {
    let mut bus = MockBus::with_devices(&[TCA, ES]);
    let mut adv = advanced(PinState::Low);
    let report = boot(
        &mut bus,
        &mut MockDelay::new(),
        &mut MockStorage::new(),
        BoardHint::Other,
        Boards {
            advanced: &mut adv,
            standard: &mut StandardBoard::default(),
        },
        &mut MockTransport::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.variant, BoardVariant::Advanced);
    assert!(report.codec_ready);
    assert_eq!(adv.headphones_at_boot(), Some(true));
    assert!(!adv.amp().is_enabled());

    // Unplugging later turns the speaker on.
    let mut monitor = adv.into_headphone_monitor();
    monitor.detect_mut().set_level(PinState::High);
    assert_eq!(monitor.poll().await, Some(false));
    assert!(monitor.amp().is_enabled());
}

#[tokio::test]
async fn test_codec_traffic_runs_at_fast_clock_after_probe_clock_reinit() {
    let mut bus = MockBus::with_devices(&[ES]);
    let mut adv = advanced(PinState::High);
    let _ = boot(
        &mut bus,
        &mut MockDelay::new(),
        &mut MockStorage::new(),
        BoardHint::Other,
        Boards {
            advanced: &mut adv,
            standard: &mut StandardBoard::default(),
        },
        &mut MockTransport::default(),
    )
    .await
    .unwrap();

    assert!(bus.probes.iter().any(|&(_, hz)| hz == BusClock::PROBE_HZ));
    assert!(bus.writes_to(ES).iter().all(|w| w.frequency == BusClock::FAST_HZ));
    // Self-test tone went out and released the PCM path.
    assert_eq!(adv.pcm().writes, 300);
    assert_eq!(adv.pcm().releases, 1);
}

#[tokio::test]
async fn test_standard_board_rate_register_follows_sample_rate() {
    let mut bus = MockBus::with_devices(&[AW]);
    let mut board = StandardBoard::new(SampleRateHz::new(48_000).unwrap());
    let mut transport = MockTransport::default();
    let outcome = CodecBringup::new(&mut bus, &mut MockDelay::new())
        .bring_up(
            BoardVariant::Standard,
            &mut advanced(PinState::High),
            &mut board,
            &mut transport,
        )
        .await;

    assert!(outcome.codec_ready);
    let i2sctrl = bus
        .writes_to(AW)
        .into_iter()
        .find(|w| w.data[0] == 0x06)
        .unwrap();
    assert_eq!(i2sctrl.data, [0x06, 0x14, 0xC8]);
}

#[tokio::test]
async fn test_hint_picks_keyboard_without_probing() {
    let mut bus = MockBus::with_devices(&[AW, EXP]);
    let report = boot(
        &mut bus,
        &mut MockDelay::new(),
        &mut MockStorage::new(),
        BoardHint::Standard,
        Boards {
            advanced: &mut advanced(PinState::High),
            standard: &mut StandardBoard::default(),
        },
        &mut MockTransport::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        report,
        BootReport {
            variant: BoardVariant::Standard,
            keyboard: KeyboardDriver::Matrix,
            codec_ready: true,
        }
    );
    assert!(bus.probes.is_empty());
}

#[tokio::test]
async fn test_missing_storage_halts_before_bring_up() {
    let mut bus = MockBus::with_devices(&[TCA, ES]);
    let mut transport = MockTransport::default();
    let result = boot(
        &mut bus,
        &mut MockDelay::new(),
        &mut MockStorage::missing(),
        BoardHint::Other,
        Boards {
            advanced: &mut advanced(PinState::High),
            standard: &mut StandardBoard::default(),
        },
        &mut transport,
    )
    .await;

    assert_eq!(result, Err(BootError::StorageMissing));
    assert!(bus.writes.is_empty());
    assert_eq!(transport.pinout, None);
}
