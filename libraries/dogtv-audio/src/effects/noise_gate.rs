/// Noise Gate
///
/// Silences the stream while its level stays below a threshold. Detection
/// is linked across channels; the gain ramps open with the attack time and
/// closed with the release time.
use super::effect::{db_to_linear, time_constant_coeff, AudioEffect};
use crate::error::Result;
use dogtv_core::AudioFormat;

/// Decay of the level envelope between peaks
const ENVELOPE_RELEASE_MS: f32 = 50.0;

/// Gap between the open and close thresholds, prevents chattering
const HYSTERESIS_DB: f32 = 3.0;

/// Noise gate settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseGateSettings {
    /// Threshold in dB (-100 to 0)
    pub threshold_db: f32,

    /// Time to open in milliseconds (0.1 to 50)
    pub attack_ms: f32,

    /// Time to close in milliseconds (5 to 2000)
    pub release_ms: f32,
}

impl NoiseGateSettings {
    /// Default settings: -60 dB threshold, 1 ms attack, 50 ms release
    pub const fn new() -> Self {
        Self {
            threshold_db: -60.0,
            attack_ms: 1.0,
            release_ms: 50.0,
        }
    }

    /// Settings with a given threshold and default timing
    pub const fn with_threshold(threshold_db: f32) -> Self {
        let mut settings = Self::new();
        settings.threshold_db = threshold_db;
        settings
    }

    /// Validate and clamp settings to safe ranges
    pub fn validate(&mut self) {
        let defaults = Self::new();
        let sane = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        self.threshold_db = sane(self.threshold_db, defaults.threshold_db).clamp(-100.0, 0.0);
        self.attack_ms = sane(self.attack_ms, defaults.attack_ms).clamp(0.1, 50.0);
        self.release_ms = sane(self.release_ms, defaults.release_ms).clamp(5.0, 2000.0);
    }
}

impl Default for NoiseGateSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Noise gate stage
pub struct NoiseGate {
    settings: NoiseGateSettings,
    enabled: bool,

    envelope: f32,
    gain: f32,
    open: bool,

    open_threshold: f32,
    close_threshold: f32,
    envelope_coeff: f32,
    attack_coeff: f32,
    release_coeff: f32,

    sample_rate: u32,
}

impl NoiseGate {
    /// Create a gate with default settings
    pub fn new() -> Self {
        Self::with_settings(NoiseGateSettings::new())
    }

    /// Create a gate with specific settings
    pub fn with_settings(mut settings: NoiseGateSettings) -> Self {
        settings.validate();
        let mut gate = Self {
            settings,
            enabled: true,
            envelope: 0.0,
            gain: 1.0,
            open: true,
            open_threshold: 0.0,
            close_threshold: 0.0,
            envelope_coeff: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate: 48_000,
        };
        gate.update_coefficients();
        gate.reset();
        gate
    }

    /// Update settings, keeping the current gate state
    pub fn set_settings(&mut self, mut settings: NoiseGateSettings) {
        settings.validate();
        self.settings = settings;
        self.update_coefficients();
    }

    /// Get current settings
    pub fn settings(&self) -> NoiseGateSettings {
        self.settings
    }

    /// Whether the gate is currently passing signal
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn update_coefficients(&mut self) {
        self.open_threshold = db_to_linear(self.settings.threshold_db);
        self.close_threshold = db_to_linear(self.settings.threshold_db - HYSTERESIS_DB);
        self.envelope_coeff = time_constant_coeff(ENVELOPE_RELEASE_MS, self.sample_rate);
        self.attack_coeff = time_constant_coeff(self.settings.attack_ms, self.sample_rate);
        self.release_coeff = time_constant_coeff(self.settings.release_ms, self.sample_rate);
    }
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for NoiseGate {
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

        for frame in buffer.chunks_exact_mut(format.channel_count()) {
            let level = frame.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));

            // Peak envelope: instant rise, exponential fall
            self.envelope = if level > self.envelope {
                level
            } else {
                self.envelope * self.envelope_coeff
            };

            if self.open && self.envelope < self.close_threshold {
                self.open = false;
            } else if !self.open && self.envelope >= self.open_threshold {
                self.open = true;
            }

            let (target, coeff) = if self.open {
                (1.0, self.attack_coeff)
            } else {
                (0.0, self.release_coeff)
            };
            self.gain = coeff * self.gain + (1.0 - coeff) * target;
            if self.gain < 1e-6 {
                self.gain = 0.0;
            }

            for sample in frame.iter_mut() {
                *sample *= self.gain;
            }
        }
    }

    fn reset(&mut self) {
        // Start at the threshold so a signal beginning at a zero crossing is not cut
        self.envelope = self.open_threshold;
        self.gain = 1.0;
        self.open = true;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Noise Gate"
    }
}
