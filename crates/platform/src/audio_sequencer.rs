//! Codec bring-up typestate machine.
//!
//! Enforces the ordering used when a codec-based audio path is powered up:
//!
//! ```text
//! [AmpHeldLow] --program_codec()--> [CodecProgrammed] --gate_amp()--> [AmpGated]
//!     [AmpGated] --tone_played()--> [Ready]
//!     [AmpGated] --tone_skipped()--> [Ready]
//! ```
//!
//! The speaker amplifier stays disabled until every codec register has been
//! acknowledged, and the self-test tone is only reachable after the amplifier
//! has been gated against the headphone jack. A failed register write leaves
//! the sequencer in [`AmpHeldLow`]; there is no transition out of it other
//! than starting again.

use core::marker::PhantomData;

// ── State types (zero-sized) ──────────────────────────────────────────────────

/// Amplifier enable driven low; codec not yet configured.
pub struct AmpHeldLow;

/// Every codec register write acknowledged; amplifier still low.
pub struct CodecProgrammed;

/// Amplifier set according to the headphone jack.
pub struct AmpGated;

/// Self-test finished (or skipped); the output path may be handed over.
pub struct Ready;

// ── Sequencer ────────────────────────────────────────────────────────────────

/// Typestate machine for codec bring-up.
///
/// Gating the amplifier before the codec is programmed is a compile error.
pub struct BringupSequencer<State> {
    _state: PhantomData<State>,
}

impl BringupSequencer<AmpHeldLow> {
    /// Start a bring-up. The caller must already have driven the amplifier
    /// enable low.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _state: PhantomData,
        }
    }

    /// All register writes succeeded.
    #[must_use]
    pub fn program_codec(self) -> BringupSequencer<CodecProgrammed> {
        BringupSequencer {
            _state: PhantomData,
        }
    }
}

impl BringupSequencer<CodecProgrammed> {
    /// The amplifier enable has been set from the headphone jack state.
    #[must_use]
    pub fn gate_amp(self) -> BringupSequencer<AmpGated> {
        BringupSequencer {
            _state: PhantomData,
        }
    }
}

impl BringupSequencer<AmpGated> {
    /// The self-test tone was played through the raw sample path.
    #[must_use]
    pub fn tone_played(self) -> BringupSequencer<Ready> {
        BringupSequencer {
            _state: PhantomData,
        }
    }

    /// The self-test tone was skipped (serial pins not routed).
    #[must_use]
    pub fn tone_skipped(self) -> BringupSequencer<Ready> {
        BringupSequencer {
            _state: PhantomData,
        }
    }
}

impl Default for BringupSequencer<AmpHeldLow> {
    fn default() -> Self {
        Self::new()
    }
}
