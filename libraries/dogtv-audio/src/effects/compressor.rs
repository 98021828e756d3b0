//! Dynamics stage
//!
//! Feed-forward, channel-linked compressor. Instead of a ratio the caller
//! specifies headroom: everything between the threshold and 0 dBFS is
//! squeezed into `headroom_db` above the threshold.

use super::effect::{db_to_linear, linear_to_db, time_constant_coeff, AudioEffect};
use crate::error::Result;
use dogtv_core::AudioFormat;

/// Soft knee width in dB
const KNEE_DB: f32 = 6.0;

/// Release of the peak detector; holds peaks across waveform cycles
const PEAK_RELEASE_MS: f32 = 50.0;

/// Level the peak detector decays toward
const NOISE_FLOOR_DB: f32 = -120.0;

/// Parameters of the dynamics stage, set by scene presets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// Level where compression starts, -60 to 0 dBFS
    pub threshold_db: f32,

    /// Headroom in dB (0.5 to 40)
    /// Room left above the threshold for a full-scale input
    pub headroom_db: f32,

    /// Gain-reduction attack, 0.1 - 100 ms
    pub attack_ms: f32,

    /// Gain-reduction release, 10 - 1000 ms
    pub release_ms: f32,

    /// Master gain after compression, 0 - 24 dB
    pub makeup_gain_db: f32,
}

impl CompressorSettings {
    /// Neutral-scene tuning
    /// - Threshold: -20 dB
    /// - Headroom: 5 dB (4:1)
    /// - Attack: 10 ms
    /// - Release: 150 ms
    /// - Makeup gain: 2 dB
    pub const fn new() -> Self {
        Self {
            threshold_db: -20.0,
            headroom_db: 5.0,
            attack_ms: 10.0,
            release_ms: 150.0,
            makeup_gain_db: 2.0,
        }
    }

    /// Clamp every field into its documented range
    ///
    /// Non-finite values fall back to the defaults.
    pub fn validate(&mut self) {
        let defaults = Self::new();
        let sane = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        self.threshold_db = sane(self.threshold_db, defaults.threshold_db).clamp(-60.0, 0.0);
        self.headroom_db = sane(self.headroom_db, defaults.headroom_db).clamp(0.5, 40.0);
        self.attack_ms = sane(self.attack_ms, defaults.attack_ms).clamp(0.1, 100.0);
        self.release_ms = sane(self.release_ms, defaults.release_ms).clamp(10.0, 1000.0);
        self.makeup_gain_db = sane(self.makeup_gain_db, defaults.makeup_gain_db).clamp(0.0, 24.0);
    }

    /// Compression ratio implied by threshold and headroom
    ///
    /// A threshold within `headroom_db` of full scale means no compression.
    pub fn ratio(&self) -> f32 {
        (-self.threshold_db / self.headroom_db).max(1.0)
    }
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel-linked compressor
///
/// Two-stage design:
/// 1. Peak level detection with instant attack and slow release, so the
///    level is stable within a waveform cycle
/// 2. Gain-reduction smoothing with the configured attack/release
pub struct Compressor {
    settings: CompressorSettings,
    enabled: bool,

    // Detector level, dBFS
    peak_level_db: f32,

    // Smoothed gain reduction, dB
    gain_reduction_db: f32,

    // Coefficient cache
    peak_release_coeff: f32,
    gr_attack_coeff: f32,
    gr_release_coeff: f32,
    makeup_gain_linear: f32,
    ratio: f32,

    sample_rate: u32,
}

impl Compressor {
    /// Compressor with neutral-scene settings
    pub fn new() -> Self {
        Self::with_settings(CompressorSettings::new())
    }

    /// Compressor with the given settings, clamped
    pub fn with_settings(mut settings: CompressorSettings) -> Self {
        settings.validate();
        let mut comp = Self {
            settings,
            enabled: true,
            peak_level_db: NOISE_FLOOR_DB,
            gain_reduction_db: 0.0,
            peak_release_coeff: 0.0,
            gr_attack_coeff: 0.0,
            gr_release_coeff: 0.0,
            makeup_gain_linear: 1.0,
            ratio: 1.0,
            sample_rate: 48_000,
        };
        comp.update_coefficients();
        comp
    }

    /// Update compressor settings
    ///
    /// Detector and gain state carry over so the change does not click.
    pub fn set_settings(&mut self, mut settings: CompressorSettings) {
        settings.validate();
        self.settings = settings;
        self.update_coefficients();
    }

    /// Get current settings
    pub fn settings(&self) -> CompressorSettings {
        self.settings
    }

    /// Current gain reduction in dB (zero or negative)
    pub fn gain_reduction_db(&self) -> f32 {
        self.gain_reduction_db
    }

    fn update_coefficients(&mut self) {
        self.peak_release_coeff = time_constant_coeff(PEAK_RELEASE_MS, self.sample_rate);
        self.gr_attack_coeff = time_constant_coeff(self.settings.attack_ms, self.sample_rate);
        self.gr_release_coeff = time_constant_coeff(self.settings.release_ms, self.sample_rate);
        self.makeup_gain_linear = db_to_linear(self.settings.makeup_gain_db);
        self.ratio = self.settings.ratio();
    }

    /// Static curve: output level for an input level (both in dB)
    #[inline]
    fn compute_output_level(&self, input_db: f32) -> f32 {
        let threshold = self.settings.threshold_db;
        let ratio = self.ratio;
        let half_knee = KNEE_DB / 2.0;
        let knee_start = threshold - half_knee;
        let knee_end = threshold + half_knee;

        if input_db <= knee_start {
            input_db
        } else if input_db >= knee_end {
            threshold + (input_db - threshold) / ratio
        } else {
            // Quadratic transition through the knee
            let x = input_db - knee_start;
            let slope_change = (1.0 - 1.0 / ratio) / (2.0 * KNEE_DB);
            input_db - slope_change * x * x
        }
    }

    #[inline]
    fn update_peak_level(&mut self, input_db: f32) {
        if input_db > self.peak_level_db {
            self.peak_level_db = input_db;
        } else {
            // Decay toward the floor, not the input: input is -inf at zero crossings
            self.peak_level_db =
                self.peak_release_coeff * (self.peak_level_db - NOISE_FLOOR_DB) + NOISE_FLOOR_DB;
        }
    }

    #[inline]
    fn smooth_gain_reduction(&mut self, target_gr_db: f32) {
        // More negative target = attacking
        let coeff = if target_gr_db < self.gain_reduction_db {
            self.gr_attack_coeff
        } else {
            self.gr_release_coeff
        };
        self.gain_reduction_db = coeff * self.gain_reduction_db + (1.0 - coeff) * target_gr_db;
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for Compressor {
    fn prepare(&mut self, format: AudioFormat) -> Result<()> {
        self.sample_rate = format.sample_rate.as_hz();
        self.update_coefficients();
        self.reset();
        Ok(())
    }

    fn process(&mut self, buffer: &mut [f32], format: AudioFormat) {
        if !self.enabled {
            return;
        }

        // Linked detection: every channel of a frame gets the same gain
        for frame in buffer.chunks_exact_mut(format.channel_count()) {
            let max_sample = frame.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));

            self.update_peak_level(linear_to_db(max_sample));
            let target_gr_db = self.compute_output_level(self.peak_level_db) - self.peak_level_db;
            self.smooth_gain_reduction(target_gr_db);

            let gain = db_to_linear(self.gain_reduction_db) * self.makeup_gain_linear;
            for sample in frame.iter_mut() {
                *sample *= gain;
            }
        }
    }

    fn reset(&mut self) {
        self.peak_level_db = NOISE_FLOOR_DB;
        self.gain_reduction_db = 0.0;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Dynamic Range Compressor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::tests::{generate_sine, peak};

    fn no_makeup(threshold_db: f32, headroom_db: f32) -> CompressorSettings {
        CompressorSettings {
            threshold_db,
            headroom_db,
            attack_ms: 1.0,
            release_ms: 50.0,
            makeup_gain_db: 0.0,
        }
    }

    #[test]
    fn ratio_from_headroom() {
        assert_eq!(no_makeup(-20.0, 5.0).ratio(), 4.0);
        assert_eq!(no_makeup(-10.0, 10.0).ratio(), 1.0);
        // Threshold closer to full scale than the headroom: no compression
        assert_eq!(no_makeup(-2.0, 5.0).ratio(), 1.0);
    }

    #[test]
    fn validate_clamps_and_repairs() {
        let mut settings = CompressorSettings {
            threshold_db: -100.0,
            headroom_db: f32::NAN,
            attack_ms: 0.0,
            release_ms: 5000.0,
            makeup_gain_db: 30.0,
        };
        settings.validate();
        assert_eq!(settings.threshold_db, -60.0);
        assert_eq!(settings.headroom_db, 5.0);
        assert_eq!(settings.attack_ms, 0.1);
        assert_eq!(settings.release_ms, 1000.0);
        assert_eq!(settings.makeup_gain_db, 24.0);
    }

    #[test]
    fn quiet_signal_untouched() {
        let mut comp = Compressor::with_settings(no_makeup(-20.0, 5.0));
        comp.prepare(AudioFormat::stereo_48k()).unwrap();

        // -40 dBFS sine, well below the knee
        let mut buffer: Vec<f32> = generate_sine(1000.0, 48_000, 0.2, 2)
            .into_iter()
            .map(|s| s * 0.01)
            .collect();
        let input = buffer.clone();
        comp.process(&mut buffer, AudioFormat::stereo_48k());

        for (out, inp) in buffer.iter().zip(&input) {
            assert!((out - inp).abs() < 1e-4);
        }
    }

    #[test]
    fn loud_signal_compressed() {
        let mut comp = Compressor::with_settings(no_makeup(-20.0, 5.0));
        comp.prepare(AudioFormat::stereo_48k()).unwrap();

        let mut buffer = generate_sine(1000.0, 48_000, 0.5, 2);
        comp.process(&mut buffer, AudioFormat::stereo_48k());

        // 0 dBFS in, 4:1 above -20 dB: about -15 dBFS out
        let out_db = 20.0 * peak(&buffer[24_000..]).log10();
        assert!((out_db + 15.0).abs() < 1.5, "output {} dBFS", out_db);
        assert!(comp.gain_reduction_db() < -10.0);
    }

    #[test]
    fn makeup_gain_applied() {
        // Threshold at full scale: ratio 1, only makeup gain acts
        let mut settings = no_makeup(0.0, 5.0);
        settings.makeup_gain_db = 6.0;
        let mut comp = Compressor::with_settings(settings);
        comp.prepare(AudioFormat::stereo_48k()).unwrap();

        let mut buffer = vec![0.1_f32; 200];
        comp.process(&mut buffer, AudioFormat::stereo_48k());
        let last = buffer.last().copied().unwrap();
        assert!((last - 0.1995).abs() < 1e-3, "{}", last);
    }

    #[test]
    fn linked_channels_share_gain() {
        let mut comp = Compressor::with_settings(no_makeup(-20.0, 5.0));
        let format = AudioFormat::stereo_48k();
        comp.prepare(format).unwrap();

        let mut buffer: Vec<f32> = (0..4_800).flat_map(|_| [0.9_f32, 0.1]).collect();
        comp.process(&mut buffer, format);

        let last = buffer.len() - 2;
        let ratio = buffer[last] / buffer[last + 1];
        assert!((ratio - 9.0).abs() < 1e-3);
    }

    #[test]
    fn reset_clears_state() {
        let mut comp = Compressor::with_settings(no_makeup(-20.0, 5.0));
        comp.prepare(AudioFormat::stereo_48k()).unwrap();
        let mut buffer = generate_sine(1000.0, 48_000, 0.1, 2);
        comp.process(&mut buffer, AudioFormat::stereo_48k());
        assert!(comp.gain_reduction_db() < 0.0);

        comp.reset();
        assert_eq!(comp.gain_reduction_db(), 0.0);
    }
}
