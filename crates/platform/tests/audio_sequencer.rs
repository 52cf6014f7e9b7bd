//! Tests for BringupSequencer: enforces codec bring-up ordering.
//!
//! The BringupSequencer typestate enforces at compile time:
//!   1. Amplifier held low while the codec is programmed
//!   2. Amplifier gated from the headphone jack: ONLY after step 1
//!   3. Self-test tone played or skipped: ONLY after step 2

use platform::audio_sequencer::{AmpGated, AmpHeldLow, BringupSequencer, CodecProgrammed, Ready};

/// The sequencer starts with the amplifier held low.
#[test]
fn sequencer_starts_with_amp_held_low() {
    let _seq: BringupSequencer<AmpHeldLow> = BringupSequencer::new();
    let _default: BringupSequencer<AmpHeldLow> = BringupSequencer::default();
}

/// Programming the codec moves to CodecProgrammed.
#[test]
fn program_codec_transitions_to_codec_programmed() {
    let seq: BringupSequencer<AmpHeldLow> = BringupSequencer::new();
    let _programmed: BringupSequencer<CodecProgrammed> = seq.program_codec();
}

/// Gating the amp is ONLY possible once the codec is programmed.
#[test]
fn gate_amp_only_from_codec_programmed() {
    let seq = BringupSequencer::new().program_codec();
    let _gated: BringupSequencer<AmpGated> = seq.gate_amp();
}

/// Both tone outcomes finish the sequence.
#[test]
fn tone_played_or_skipped_reaches_ready() {
    let played: BringupSequencer<Ready> = BringupSequencer::new()
        .program_codec()
        .gate_amp()
        .tone_played();
    let skipped: BringupSequencer<Ready> = BringupSequencer::new()
        .program_codec()
        .gate_amp()
        .tone_skipped();
    let _ = (played, skipped);
}

/// The states carry no runtime data.
#[test]
fn sequencer_is_zero_sized() {
    assert_eq!(core::mem::size_of::<BringupSequencer<AmpHeldLow>>(), 0);
    assert_eq!(core::mem::size_of::<BringupSequencer<Ready>>(), 0);
}
