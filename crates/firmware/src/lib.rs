//! Pocket Player firmware
//!
//! Control core of a handheld MP3 player with two possible board variants:
//! the advanced board (ES8311 codec, TCA8418 keyboard controller) and the
//! standard board (AW88298 amplifier, matrix keyboard).
//!
//! # Architecture
//!
//! ```text
//! boot: detect ─► keyboard driver ─► storage mount ─► CodecBringup (+ fallback)
//!                                                          │
//!            ┌─────────────────── PlaybackLink ────────────┴──────────┐
//!            ▼                                                        ▼
//!   RenderTask (40 ms)  ──PlaybackCommand──►  AudioTask (1 ms busy / 20 ms idle)
//!   keys, navigation,   ◄──PlaybackSnapshot──  transport, end-of-track
//!   renderer
//! ```
//!
//! # Features
//!
//! - `emulator` - Desktop simulator binary (tokio, clap, tracing-subscriber)
//! - `std` - Enable standard library (for emulator and testing)
//! - `defmt` - defmt derives on the shared types
//!
//! # Examples
//!
//! ## Emulator Target
//!
//! ```bash
//! MUSIC_PATH=~/Music cargo run -p firmware --bin simulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::unused_async)]

pub mod audio;
pub mod board;
pub mod boot;
pub mod render_task;

#[cfg(feature = "emulator")]
pub mod emulator;

// Re-export key types
pub use audio::{BringupOutcome, CodecBringup, HeadphoneMonitor};
pub use board::{BoardHint, BoardVariant, BringupError, KeyboardDriver};
pub use boot::{boot, BootError, BootReport};
pub use render_task::RenderTask;
