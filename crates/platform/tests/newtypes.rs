//! Type system enforcement tests for the player's domain newtypes.
//! These newtypes keep out-of-range gains, rates and bus addresses from
//! ever reaching a driver.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

// ── Volume ───────────────────────────────────────────────────────────────────

#[test]
fn volume_new_clamps_over_max() {
    use platform::audio_types::Volume;
    let v = Volume::new(40);
    assert_eq!(v.get(), 21, "Volume::new(40) should clamp to 21");
}

#[test]
fn volume_default_is_ten() {
    use platform::audio_types::Volume;
    assert_eq!(Volume::default().get(), 10);
}

#[test]
fn volume_try_new_rejects_over_max() {
    use platform::audio_types::Volume;
    let err = Volume::try_new(22).unwrap_err();
    assert_eq!((err.value, err.min, err.max), (22, 0, 21));
    assert!(Volume::try_new(255).is_err());
}

#[test]
fn volume_try_new_accepts_valid_range() {
    use platform::audio_types::Volume;
    assert!(Volume::try_new(0).is_ok());
    assert!(Volume::try_new(21).is_ok());
}

#[test]
fn volume_steps_by_four_and_saturates() {
    use platform::audio_types::Volume;
    let v = Volume::default();
    assert_eq!(v.step_up().get(), 14);
    assert_eq!(v.step_up().step_up().step_up().get(), 21);
    assert_eq!(v.step_down().get(), 6);
    assert_eq!(Volume::new(2).step_down().get(), 0);
}

#[test]
fn volume_is_one_byte() {
    use platform::audio_types::Volume;
    assert_eq!(core::mem::size_of::<Volume>(), 1);
}

// ── Brightness ───────────────────────────────────────────────────────────────

#[test]
fn brightness_starts_at_128() {
    use platform::audio_types::Brightness;
    assert_eq!(Brightness::default().get(), 128);
}

#[test]
fn brightness_step_wraps_past_255() {
    use platform::audio_types::Brightness;
    let b = Brightness::default().step_up();
    assert_eq!(b.get(), 192);
    assert_eq!(b.step_up().get(), 0);
    assert_eq!(Brightness::new(250).step_up().get(), 58);
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_cd_is_44100() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(SampleRateHz::CD.get(), 44_100);
}

#[test]
fn sample_rate_rejects_below_min() {
    use platform::audio_types::SampleRateHz;
    assert!(SampleRateHz::new(7_999).is_err());
    assert!(SampleRateHz::new(0).is_err());
}

#[test]
fn sample_rate_accepts_common_rates() {
    use platform::audio_types::SampleRateHz;
    for hz in [8_000, 16_000, 22_050, 44_100, 48_000, 96_000] {
        assert!(SampleRateHz::new(hz).is_ok(), "{hz} Hz should be accepted");
    }
}

// ── I2cAddr ──────────────────────────────────────────────────────────────────

#[test]
fn i2c_addr_rejects_reserved_ranges() {
    use platform::audio_types::I2cAddr;
    for addr in [0x00, 0x07, 0x78, 0x7F] {
        assert!(I2cAddr::try_new(addr).is_err(), "{addr:#04x} is reserved");
    }
}

#[test]
fn i2c_addr_accepts_board_devices() {
    use platform::audio_types::I2cAddr;
    use platform::board_config::I2cAddresses;
    for addr in [
        I2cAddresses::TCA8418_KEYBOARD,
        I2cAddresses::ES8311_CODEC,
        I2cAddresses::AW88298_AMP,
        I2cAddresses::AW9523_EXPANDER,
    ] {
        assert_eq!(I2cAddr::try_new(addr.get()), Ok(addr));
    }
}
