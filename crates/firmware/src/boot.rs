//! Boot sequence.
//!
//! Order:
//!   1. detect the board variant (hint first, then bus probes)
//!   2. pick the keyboard backend
//!   3. mount storage; a missing medium halts boot here
//!   4. bring up the codec, falling back to the other board once
//!
//! Only step 3 can fail. A failed bring-up leaves `codec_ready` false and
//! boot continues with silent playback.

use embedded_hal_async::delay::DelayNs;
use platform::{I2cPeripheral, Storage, Transport};

use crate::audio::CodecBringup;
use crate::board::{self, AudioBoard, BoardHint, BoardVariant, KeyboardDriver};

/// Error that stops the boot sequence before the tasks start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// No storage medium could be mounted.
    #[error("storage medium missing")]
    StorageMissing,
}

/// What boot found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    /// Variant after bring-up (may differ from detection after a fallback).
    pub variant: BoardVariant,
    /// Keyboard backend in use.
    pub keyboard: KeyboardDriver,
    /// The transport may be driven.
    pub codec_ready: bool,
}

/// The two candidate audio boards.
pub struct Boards<'a, A, S> {
    /// Advanced board (ES8311).
    pub advanced: &'a mut A,
    /// Standard board (AW88298).
    pub standard: &'a mut S,
}

/// Run the boot sequence.
pub async fn boot<B, D, St, A, Sb, T>(
    bus: &mut B,
    delay: &mut D,
    storage: &mut St,
    hint: BoardHint,
    boards: Boards<'_, A, Sb>,
    transport: &mut T,
) -> Result<BootReport, BootError>
where
    B: I2cPeripheral,
    D: DelayNs,
    St: Storage,
    A: AudioBoard,
    Sb: AudioBoard,
    T: Transport,
{
    tracing::info!(app = platform::config::APP_NAME, version = platform::config::APP_VERSION, "boot");

    let detected = board::detect(bus, delay, hint).await;
    let keyboard = board::keyboard_driver(bus, detected, hint).await;

    if let Err(e) = storage.mount().await {
        tracing::error!(error = ?e, "storage mount failed, halting");
        return Err(BootError::StorageMissing);
    }
    tracing::info!("storage mounted");

    let outcome = CodecBringup::new(bus, delay)
        .bring_up(detected, boards.advanced, boards.standard, transport)
        .await;
    if outcome.variant != detected {
        tracing::warn!(
            detected = detected.name(),
            actual = outcome.variant.name(),
            "variant corrected by bring-up"
        );
    }

    Ok(BootReport {
        variant: outcome.variant,
        keyboard,
        codec_ready: outcome.codec_ready,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::audio::MockAmp;
    use crate::board::{AdvancedBoard, StandardBoard};
    use platform::mocks::{MockBus, MockDelay, MockPcmOutput, MockPin, MockStorage, MockTransport};
    use platform::PinState;

    async fn boot_with(devices: &[u8], mut storage: MockStorage) -> Result<BootReport, BootError> {
        let mut bus = MockBus::with_devices(devices);
        let mut delay = MockDelay::new();
        let mut advanced =
            AdvancedBoard::new(MockAmp::new(), MockPin::new(PinState::High), MockPcmOutput::new());
        let mut standard = StandardBoard::default();
        boot(
            &mut bus,
            &mut delay,
            &mut storage,
            BoardHint::Other,
            Boards {
                advanced: &mut advanced,
                standard: &mut standard,
            },
            &mut MockTransport::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_missing_medium_halts() {
        let result = boot_with(&[0x34, 0x18], MockStorage::missing()).await;
        assert_eq!(result, Err(BootError::StorageMissing));
    }

    #[tokio::test]
    async fn test_advanced_board_boots_ready() {
        let report = boot_with(&[0x34, 0x18], MockStorage::new()).await.unwrap();
        assert_eq!(
            report,
            BootReport {
                variant: BoardVariant::Advanced,
                keyboard: KeyboardDriver::Tca8418,
                codec_ready: true,
            }
        );
    }

    #[tokio::test]
    async fn test_standard_board_boots_with_matrix_keyboard() {
        let report = boot_with(&[0x36, 0x58], MockStorage::new()).await.unwrap();
        assert_eq!(report.variant, BoardVariant::Standard);
        assert_eq!(report.keyboard, KeyboardDriver::Matrix);
        assert!(report.codec_ready);
    }

    #[tokio::test]
    async fn test_silent_board_still_boots() {
        let report = boot_with(&[], MockStorage::new()).await.unwrap();
        assert!(!report.codec_ready);
        assert_eq!(report.keyboard, KeyboardDriver::Matrix);
    }
}
