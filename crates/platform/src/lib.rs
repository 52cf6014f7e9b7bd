//! Hardware Abstraction Layer (HAL) for the pocket player
//!
//! This crate provides trait-based abstractions for every collaborator the
//! control core talks to, enabling development and testing without physical
//! hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Feature Layers (playback, ui, library)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Board Layer (HAL drivers for the two-wire bus, I2S, SD card)
//! ```
//!
//! # Abstraction Levels
//!
//! ## High-Level Collaborators
//! - [`Transport`] - External decode/output engine
//! - [`PcmOutput`] - Raw sample path used before the engine takes over
//! - [`Storage`] - Directory enumeration and existence checks
//! - [`InputDevice`] - Keyboard key stream
//!
//! ## Low-Level Peripherals
//! - [`bus`] - Two-wire bus transactions, presence probe, scan
//! - [`gpio`] - Per-variant pin map
//!
//! # Features
//!
//! - `std`: Enable standard library support (desktop storage, mocks)
//! - `defmt`: Enable defmt derives
//!
//! # Example
//!
//! ```no_run
//! use platform::bus::{probe, I2cPeripheral};
//!
//! async fn example<B: I2cPeripheral>(bus: &mut B) -> bool {
//!     probe(bus, 0x18, 100_000).await.present
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod audio_sequencer;
pub mod audio_types;
pub mod board_config;
pub mod bus;
pub mod config;
pub mod gpio;
pub mod input;
pub mod mocks;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod storage_local;

// Re-export main high-level traits
pub use audio::{I2sPins, OutputFormat, PcmOutput, Transport};
pub use input::{InputDevice, Key};
pub use storage::{DirEntry, Storage};

// Re-export bus types
pub use bus::{probe, scan, AddressMode, HalBus, I2cConfig, I2cPeripheral, ProbeResult};

// Re-export pin map types
pub use gpio::{GpioNum, HardwarePins, PinState};

// Re-export newtypes
pub use audio_types::{Brightness, I2cAddr, OutOfRangeError, SampleRateHz, Volume};
