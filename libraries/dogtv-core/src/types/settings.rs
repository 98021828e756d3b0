//! User-facing audio settings
//!
//! `AudioSettings` is the only configuration contract the pipeline accepts.
//! It is built at session start (from defaults or a preference store) and
//! pushed into the pipeline whenever the settings UI changes it.

use super::equalizer::EqualizerSettings;
use super::frequency::FrequencyRange;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Default output volume
const DEFAULT_VOLUME: f32 = 0.8;

fn validate_volume(volume: f32) -> Result<f32> {
    if volume.is_finite() && (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(ConfigError::InvalidVolume(volume))
    }
}

/// Audio settings for a viewing session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AudioSettingsRecord")]
pub struct AudioSettings {
    /// Output volume (0.0 - 1.0) - private to enforce validation
    volume: f32,

    /// Whether audio output is enabled at all
    pub enabled: bool,

    /// Band the canine filter keeps
    pub frequency_range: FrequencyRange,

    /// Whether the scene mix includes its nature-sound layer
    pub include_nature_sounds: bool,

    /// Equalizer gains
    pub equalizer: EqualizerSettings,
}

impl AudioSettings {
    /// Create validated settings
    pub fn new(
        volume: f32,
        enabled: bool,
        frequency_range: FrequencyRange,
        include_nature_sounds: bool,
        equalizer: EqualizerSettings,
    ) -> Result<Self> {
        Ok(Self {
            volume: validate_volume(volume)?,
            enabled,
            frequency_range,
            include_nature_sounds,
            equalizer,
        })
    }

    /// Get the volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume (rejected outside 0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = validate_volume(volume)?;
        Ok(())
    }

    /// Builder-style variant of [`set_volume`](Self::set_volume)
    pub fn with_volume(mut self, volume: f32) -> Result<Self> {
        self.set_volume(volume)?;
        Ok(self)
    }

    /// Replace the frequency range
    pub fn with_frequency_range(mut self, range: FrequencyRange) -> Self {
        self.frequency_range = range;
        self
    }

    /// Replace the equalizer
    pub fn with_equalizer(mut self, equalizer: EqualizerSettings) -> Self {
        self.equalizer = equalizer;
        self
    }

    /// Enable or disable output
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Linear gain the output stage applies (0.0 when disabled)
    pub fn output_gain(&self) -> f32 {
        if self.enabled {
            self.volume
        } else {
            0.0
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            enabled: true,
            frequency_range: FrequencyRange::High,
            include_nature_sounds: true,
            equalizer: EqualizerSettings::flat(),
        }
    }
}

/// Serialized form; every field is optional and falls back to the default
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct AudioSettingsRecord {
    volume: f32,
    enabled: bool,
    frequency_range: FrequencyRange,
    include_nature_sounds: bool,
    equalizer: EqualizerSettings,
}

impl Default for AudioSettingsRecord {
    fn default() -> Self {
        let defaults = AudioSettings::default();
        Self {
            volume: defaults.volume,
            enabled: defaults.enabled,
            frequency_range: defaults.frequency_range,
            include_nature_sounds: defaults.include_nature_sounds,
            equalizer: defaults.equalizer,
        }
    }
}

impl TryFrom<AudioSettingsRecord> for AudioSettings {
    type Error = ConfigError;

    fn try_from(raw: AudioSettingsRecord) -> Result<Self> {
        Self::new(
            raw.volume,
            raw.enabled,
            raw.frequency_range,
            raw.include_nature_sounds,
            raw.equalizer,
        )
    }
}
