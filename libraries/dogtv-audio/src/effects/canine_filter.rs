/// Canine band filter
///
/// Keeps the band a `FrequencyRange` resolves to and attenuates everything
/// outside it. Each edge is a 4th-order Butterworth slope built from two
/// cascaded second-order sections, so the stage only cuts and never boosts.
use super::biquad::{Biquad, BiquadCoefficients, MAX_CORNER_RATIO};
use super::effect::AudioEffect;
use crate::error::Result;
use dogtv_core::{AudioFormat, FrequencyRange, HertzRange};

/// Section Qs of a 4th-order Butterworth response
const BUTTERWORTH_4TH_Q: [f32; 2] = [0.541_196_1, 1.306_563];

/// Band-limiting stage driven by the canine hearing policy
pub struct CanineBandFilter {
    range: HertzRange,
    high_pass: [Biquad; 2],
    low_pass: [Biquad; 2],
    hp_active: bool,
    lp_active: bool,
    sample_rate: u32,
    enabled: bool,
}

impl CanineBandFilter {
    /// Create a filter for a policy range
    pub fn new(range: FrequencyRange) -> Self {
        Self::with_range(range.hertz_range())
    }

    /// Create a filter for explicit band edges
    pub fn with_range(range: HertzRange) -> Self {
        Self {
            range,
            high_pass: [Biquad::new(), Biquad::new()],
            low_pass: [Biquad::new(), Biquad::new()],
            hp_active: false,
            lp_active: false,
            sample_rate: 0,
            enabled: true,
        }
    }

    /// Band currently kept
    pub fn range(&self) -> HertzRange {
        self.range
    }

    /// Change the kept band
    ///
    /// The new response takes effect immediately. Gliding between bands would
    /// let content from the old band leak through for several milliseconds.
    pub fn set_range(&mut self, range: HertzRange) {
        if range == self.range && self.sample_rate > 0 {
            return;
        }
        self.range = range;
        self.configure();
    }

    /// Whether the high-pass edge is filtering
    pub fn high_pass_active(&self) -> bool {
        self.hp_active
    }

    /// Whether the low-pass edge is filtering
    pub fn low_pass_active(&self) -> bool {
        self.lp_active
    }

    fn configure(&mut self) {
        if self.sample_rate == 0 {
            return;
        }
        let sr = self.sample_rate as f32;
        let limit = sr * MAX_CORNER_RATIO;

        let lower = self.range.lower() as f32;
        let upper = self.range.upper() as f32;

        // Band starts at DC: nothing to cut below it
        self.hp_active = lower > 0.0;
        // Band extends past what the stream can carry
        self.lp_active = upper < limit;

        let hp_corner = lower.min(limit);
        for (section, q) in self.high_pass.iter_mut().zip(BUTTERWORTH_4TH_Q) {
            let coeffs = if self.hp_active {
                BiquadCoefficients::high_pass(sr, hp_corner, q)
            } else {
                BiquadCoefficients::IDENTITY
            };
            section.snap_to(coeffs);
            section.reset();
        }
        for (section, q) in self.low_pass.iter_mut().zip(BUTTERWORTH_4TH_Q) {
            let coeffs = if self.lp_active {
                BiquadCoefficients::low_pass(sr, upper, q)
            } else {
                BiquadCoefficients::IDENTITY
            };
            section.snap_to(coeffs);
            section.reset();
        }
    }
}

impl AudioEffect for CanineBandFilter {
    fn prepare(&mut self, format: AudioFormat) -> Result<()> {
        self.sample_rate = format.sample_rate.as_hz();
        self.configure();
        Ok(())
    }

    fn process(&mut self, buffer: &mut [f32], format: AudioFormat) {
        if !self.enabled || self.sample_rate == 0 || !(self.hp_active || self.lp_active) {
            return;
        }

        let channels = format.channel_count();
        for frame in buffer.chunks_exact_mut(channels) {
            for (ch, sample) in frame.iter_mut().enumerate() {
                let mut x = *sample;
                if self.hp_active {
                    for section in &mut self.high_pass {
                        x = section.process_sample(ch, x);
                    }
                }
                if self.lp_active {
                    for section in &mut self.low_pass {
                        x = section.process_sample(ch, x);
                    }
                }
                *sample = x;
            }
        }
    }

    fn reset(&mut self) {
        for section in self.high_pass.iter_mut().chain(self.low_pass.iter_mut()) {
            section.reset();
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Canine Band Filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::tests::{generate_sine, rms};
    use dogtv_core::SampleRate;

    fn prepared(range: HertzRange, sample_rate: u32) -> CanineBandFilter {
        let mut filter = CanineBandFilter::with_range(range);
        filter
            .prepare(AudioFormat::new(SampleRate::new(sample_rate), 2))
            .unwrap();
        filter
    }

    #[test]
    fn high_range_at_48k_removes_audible_tone() {
        let mut filter = CanineBandFilter::new(FrequencyRange::High);
        let format = AudioFormat::stereo_48k();
        filter.prepare(format).unwrap();
        assert!(filter.high_pass_active());
        assert!(!filter.low_pass_active());

        let input = generate_sine(440.0, 48_000, 1.0, 2);
        let mut buffer = input.clone();
        filter.process(&mut buffer, format);
        assert!(rms(&buffer) < rms(&input) * 0.1);
    }

    #[test]
    fn low_range_keeps_in_band_tone() {
        let mut filter = prepared(FrequencyRange::Low.hertz_range(), 48_000);
        assert!(!filter.high_pass_active());
        assert!(filter.low_pass_active());

        let input = generate_sine(440.0, 48_000, 0.5, 2);
        let mut buffer = input.clone();
        filter.process(&mut buffer, AudioFormat::stereo_48k());
        let ratio = rms(&buffer[4_800..]) / rms(&input[4_800..]);
        assert!((ratio - 1.0).abs() < 0.02, "ratio {}", ratio);
    }

    #[test]
    fn band_edges_attenuate_outside() {
        let range = HertzRange::new(1_000.0, 4_000.0).unwrap();
        let mut filter = prepared(range, 48_000);

        let below = generate_sine(100.0, 48_000, 0.5, 2);
        let mut buffer = below.clone();
        filter.process(&mut buffer, AudioFormat::stereo_48k());
        assert!(rms(&buffer[4_800..]) < rms(&below[4_800..]) * 0.01);

        filter.reset();
        let above = generate_sine(16_000.0, 48_000, 0.5, 2);
        let mut buffer = above.clone();
        filter.process(&mut buffer, AudioFormat::stereo_48k());
        assert!(rms(&buffer[4_800..]) < rms(&above[4_800..]) * 0.05);
    }

    #[test]
    fn never_boosts() {
        let range = HertzRange::new(500.0, 8_000.0).unwrap();
        let mut filter = prepared(range, 48_000);
        for freq in [200.0, 500.0, 2_000.0, 8_000.0, 12_000.0] {
            filter.reset();
            let input = generate_sine(freq, 48_000, 0.25, 2);
            let mut buffer = input.clone();
            filter.process(&mut buffer, AudioFormat::stereo_48k());
            assert!(rms(&buffer[2_400..]) <= rms(&input[2_400..]) * 1.01, "{} Hz", freq);
        }
    }

    #[test]
    fn full_range_is_passthrough() {
        let range = HertzRange::new(0.0, 100_000.0).unwrap();
        let mut filter = prepared(range, 48_000);
        let input = generate_sine(440.0, 48_000, 0.05, 2);
        let mut buffer = input.clone();
        filter.process(&mut buffer, AudioFormat::stereo_48k());
        assert_eq!(buffer, input);
    }

    #[test]
    fn range_change_applies_immediately() {
        let mut filter = prepared(FrequencyRange::Low.hertz_range(), 48_000);
        filter.set_range(FrequencyRange::High.hertz_range());
        assert!(filter.high_pass_active());
        assert_eq!(filter.range(), FrequencyRange::High.hertz_range());
    }
}
