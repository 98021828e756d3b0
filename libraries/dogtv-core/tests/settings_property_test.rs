//! Property tests: every way of building settings applies the same validation

use dogtv_core::{
    AudioSettings, ConfigError, EqBandId, EqualizerSettings, FrequencyRange, HertzRange,
    CANINE_HEARING_POLICY, MAX_GAIN_DB, MIN_GAIN_DB,
};
use proptest::prelude::*;

fn in_range(gain: f32) -> bool {
    gain.is_finite() && (MIN_GAIN_DB..=MAX_GAIN_DB).contains(&gain)
}

fn any_gain() -> impl Strategy<Value = f32> {
    prop_oneof![
        6 => -30.0f32..30.0,
        1 => Just(f32::NAN),
        1 => Just(f32::INFINITY),
        1 => Just(MIN_GAIN_DB),
        1 => Just(MAX_GAIN_DB),
    ]
}

proptest! {
    /// Property: constructor, setter and deserialization agree on which gains are valid
    #[test]
    fn gain_validation_is_consistent(gain in any_gain(), band_index in 0usize..5) {
        let band = EqBandId::ALL[band_index];
        let valid = in_range(gain);

        let mut gains = [0.0; 5];
        gains[band.index()] = gain;
        prop_assert_eq!(EqualizerSettings::new(gains).is_ok(), valid);

        let mut settings = EqualizerSettings::flat();
        let result = settings.set_gain(band, gain);
        prop_assert_eq!(result.is_ok(), valid);
        if !valid {
            // Rejected updates leave the old value in place
            prop_assert_eq!(settings.gain(band), 0.0);
            let is_invalid_gain = matches!(result, Err(ConfigError::InvalidGain { .. }));
            prop_assert!(is_invalid_gain);
        }

        // JSON cannot carry NaN or infinity; those cases are covered above
        if gain.is_finite() {
            let json = format!("{{\"{}\": {}}}", band.name(), gain);
            let parsed: Result<EqualizerSettings, _> = serde_json::from_str(&json);
            prop_assert_eq!(parsed.is_ok(), valid);
        }
    }

    /// Property: volume is accepted exactly on [0, 1]
    #[test]
    fn volume_validation(volume in -2.0f32..2.0) {
        let valid = (0.0..=1.0).contains(&volume);
        prop_assert_eq!(AudioSettings::default().with_volume(volume).is_ok(), valid);

        let json = format!("{{\"volume\": {}}}", volume);
        let parsed: Result<AudioSettings, _> = serde_json::from_str(&json);
        prop_assert_eq!(parsed.is_ok(), valid);
    }

    /// Property: every frequency maps to at most one range of the policy
    #[test]
    fn ranges_are_disjoint(hz in 0.0f64..70_000.0) {
        let matches = FrequencyRange::ALL
            .iter()
            .filter(|r| CANINE_HEARING_POLICY.hertz_range(**r).contains(hz))
            .count();
        let expected = usize::from(hz < CANINE_HEARING_POLICY.max_hz());
        prop_assert_eq!(matches, expected);
    }

    /// Property: HertzRange accepts exactly ordered, non-negative, finite bounds
    #[test]
    fn hertz_range_validation(lower in -100.0f64..100.0, upper in -100.0f64..100.0) {
        let valid = lower >= 0.0 && lower < upper;
        prop_assert_eq!(HertzRange::new(lower, upper).is_ok(), valid);
    }
}

#[test]
fn canine_policy_is_valid() {
    CANINE_HEARING_POLICY.validate().unwrap();
    assert_eq!(FrequencyRange::High.hertz_range().as_tuple(), (20_000.0, 45_000.0));
    assert_eq!(FrequencyRange::default(), FrequencyRange::High);
}
