//! Audio subsystem: amplifier control, jack monitoring, self-test tone and
//! the bring-up fallback policy.
//!
//! # Structure
//!
//! - `amp/`: speaker amplifier gating (`EnablePinAmp` hardware, `MockAmp` for tests)
//! - `headphone`: jack polling that re-gates the amplifier
//! - `tone`: sine burst over the raw PCM path
//! - `bringup`: [`CodecBringup`]: detected board first, the other one once
//!
//! # Dependency Injection
//!
//! Boards and the transport are generic; concrete types are injected at the
//! call site:
//!
//! ```rust,ignore
//! let outcome = CodecBringup::new(&mut bus, &mut delay)
//!     .bring_up(variant, &mut advanced, &mut standard, &mut transport)
//!     .await;
//! ```

pub mod amp;
pub mod bringup;
pub mod headphone;
pub mod tone;

pub use amp::{AmpDriver, EnablePinAmp, MockAmp};
pub use bringup::{BringupOutcome, CodecBringup};
pub use headphone::HeadphoneMonitor;
pub use tone::{play_test_tone, TestTone, ToneOutcome};
