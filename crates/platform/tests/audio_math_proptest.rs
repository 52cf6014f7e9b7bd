//! Property-based tests for the player's numeric newtypes.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.

use platform::audio_types::{Brightness, SampleRateHz, Volume};

proptest::proptest! {
    /// Volume::new never panics for any u8 input (clamps to 21).
    #[test]
    fn volume_new_never_exceeds_max(raw in 0u8..=255u8) {
        assert!(Volume::new(raw).get() <= Volume::MAX);
    }

    /// Any sequence of volume presses stays inside 0..=21.
    #[test]
    fn volume_presses_stay_in_range(start in 0u8..=21u8, presses in proptest::collection::vec(proptest::bool::ANY, 0..64)) {
        let mut v = Volume::new(start);
        for up in presses {
            v = if up { v.step_up() } else { v.step_down() };
            assert!(v.get() <= Volume::MAX);
        }
    }

    /// Stepping up never makes the output quieter.
    #[test]
    fn volume_step_up_is_monotone(raw in 0u8..=21u8) {
        let v = Volume::new(raw);
        assert!(v.step_up() >= v);
        assert!(v.step_down() <= v);
    }

    /// Four brightness presses return to the starting level.
    #[test]
    fn brightness_cycles_in_four_presses(raw in 0u8..=255u8) {
        let b = Brightness::new(raw);
        assert_eq!(b.step_up().step_up().step_up().step_up(), b);
    }

    /// SampleRateHz valid range [8000, 96000] always succeeds.
    #[test]
    fn sample_rate_hz_valid_range_always_ok(hz in 8_000u32..=96_000u32) {
        assert!(SampleRateHz::new(hz).is_ok(),
            "SampleRateHz::new({}) should be Ok within [8000, 96000]", hz);
    }

    /// SampleRateHz out of range always fails.
    #[test]
    fn sample_rate_hz_out_of_range_always_err(hz in 96_001u32..=u32::MAX) {
        assert!(SampleRateHz::new(hz).is_err(),
            "SampleRateHz::new({}) should be Err above 96000", hz);
    }
}
