/// Audio buffer and stream format types
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of interleaved channels a pipeline accepts
pub const MAX_CHANNELS: usize = 8;

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);
    pub const HIGH_RES_96: Self = Self(96_000);
    pub const HIGH_RES_192: Self = Self(192_000);

    /// Lowest sample rate the pipeline will prepare for
    pub const MIN: Self = Self(8_000);
    /// Highest sample rate the pipeline will prepare for
    pub const MAX: Self = Self(384_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Stream format of an interleaved `f32` buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Stereo at the platform's native 48 kHz output rate
    pub fn stereo_48k() -> Self {
        Self::new(SampleRate::DVD_QUALITY, 2)
    }

    /// Check that the pipeline can be prepared for this format
    pub fn validate(&self) -> Result<()> {
        let hz = self.sample_rate.as_hz();
        if !(SampleRate::MIN.as_hz()..=SampleRate::MAX.as_hz()).contains(&hz) {
            return Err(ConfigError::invalid_format(format!(
                "sample rate {} Hz (must be between 8000 and 384000)",
                hz
            )));
        }
        if self.channels == 0 || usize::from(self.channels) > MAX_CHANNELS {
            return Err(ConfigError::invalid_format(format!(
                "{} channels (must be 1-{})",
                self.channels, MAX_CHANNELS
            )));
        }
        Ok(())
    }

    /// Channel count as usize, for slicing interleaved frames
    pub fn channel_count(&self) -> usize {
        usize::from(self.channels)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}ch", self.sample_rate, self.channels)
    }
}

/// Audio buffer handed to the pipeline
///
/// Samples are stored as f32 in the range [-1.0, 1.0]
/// Interleaved format: [L, R, L, R, ...] for stereo
///
/// The sample count is fixed once allocated; pipeline stages process the
/// samples in place and never change the frame count.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Audio samples (f32, interleaved)
    pub samples: Vec<f32>,

    /// Audio format information
    pub format: AudioFormat,
}

impl AudioBuffer {
    /// Create a new audio buffer
    pub fn new(samples: Vec<f32>, format: AudioFormat) -> Self {
        Self { samples, format }
    }

    /// Create a silent buffer holding `frames` frames
    pub fn silence(frames: usize, format: AudioFormat) -> Self {
        Self {
            samples: vec![0.0; frames * format.channel_count()],
            format,
        }
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        match self.format.channel_count() {
            0 => 0,
            channels => self.samples.len() / channels,
        }
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.format.channels
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.format.sample_rate.as_hz())
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the sample count divides evenly into whole frames
    pub fn is_frame_aligned(&self) -> bool {
        let channels = self.format.channel_count();
        channels > 0 && self.samples.len() % channels == 0
    }
}
