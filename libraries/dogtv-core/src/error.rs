/// Configuration error types for DogTV+
use thiserror::Error;

/// Result type alias using `ConfigError`
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while constructing or validating settings
///
/// These surface synchronously at settings-construction time, before any
/// value reaches the audio pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Equalizer gain outside [-12, +12] dB or not a finite number
    #[error("Invalid {band} gain: {gain_db} dB (must be between -12 and +12 dB)")]
    InvalidGain { band: &'static str, gain_db: f32 },

    /// Frequency range with a negative, inverted, empty or non-finite interval
    #[error("Invalid frequency range: [{lower}, {upper}] Hz (lower bound must be >= 0 and below upper bound)")]
    InvalidRange { lower: f64, upper: f64 },

    /// Volume outside [0.0, 1.0] or not a finite number
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f32),

    /// Unsupported sample rate or channel layout
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    /// Scene name not present in the catalogue
    #[error("Unknown scene: {0}")]
    UnknownScene(String),
}

impl ConfigError {
    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}
