//! Transport that decodes nothing.

use std::fs;

use platform::storage_local::LocalFileStorage;
use platform::{I2sPins, Transport, Volume};

/// Bytes consumed per step.
const BYTES_PER_STEP: u64 = 4_096;

/// Runs each opened file for one step per [`BYTES_PER_STEP`] of its size.
pub struct SimTransport {
    files: LocalFileStorage,
    remaining: u64,
}

impl SimTransport {
    /// Transport resolving player paths under `music_root`.
    pub fn new(music_root: &str) -> Self {
        Self {
            files: LocalFileStorage::new(music_root),
            remaining: 0,
        }
    }
}

impl Transport for SimTransport {
    async fn open(&mut self, source: &str) -> bool {
        match fs::metadata(self.files.resolve(source)) {
            Ok(meta) if meta.is_file() => {
                self.remaining = meta.len().div_ceil(BYTES_PER_STEP).max(1);
                tracing::info!(source, steps = self.remaining, "transport open");
                true
            }
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(source, error = %e, "transport cannot open source");
                false
            }
        }
    }

    async fn stop(&mut self) {
        self.remaining = 0;
    }

    async fn step(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn is_running(&self) -> bool {
        self.remaining > 0
    }

    fn set_volume(&mut self, volume: Volume) {
        tracing::info!(volume = volume.get(), "transport volume");
    }

    fn set_pinout(&mut self, pins: I2sPins) {
        tracing::info!(
            bclk = pins.bit_clock.0,
            lrck = pins.frame_clock.0,
            dout = pins.data_out.0,
            "transport pinout"
        );
    }
}
