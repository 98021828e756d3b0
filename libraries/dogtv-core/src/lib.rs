//! DogTV+ Core
//!
//! Platform-agnostic types and validation shared by the DogTV+ audio crates.
//!
//! This crate defines:
//! - **Buffer Types**: `AudioBuffer`, `AudioFormat`, `SampleRate`
//! - **Configuration**: `AudioSettings`, `EqualizerSettings`
//! - **Frequency Policy**: `FrequencyRange` resolved through `CANINE_HEARING_POLICY`
//! - **Scenes**: the scene catalogue and the mood each scene is tuned for
//! - **Error Handling**: `ConfigError` and `Result`
//!
//! All settings types validate on construction. Out-of-range values are
//! rejected with a descriptive `ConfigError` rather than silently clamped.
//!
//! # Example
//!
//! ```rust
//! use dogtv_core::{AudioSettings, EqualizerSettings, FrequencyRange};
//!
//! # fn example() -> dogtv_core::Result<()> {
//! let settings = AudioSettings::default();
//! assert_eq!(settings.frequency_range, FrequencyRange::High);
//!
//! let range = settings.frequency_range.hertz_range();
//! assert_eq!(range.as_tuple(), (20_000.0, 45_000.0));
//!
//! let eq = EqualizerSettings::three_band(3.0, 0.0, -2.0)?;
//! let settings = settings.with_equalizer(eq).with_volume(0.6)?;
//! assert_eq!(settings.volume(), 0.6);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

pub use error::{ConfigError, Result};
pub use types::{
    // Audio types
    AudioBuffer, AudioFormat, SampleRate, MAX_CHANNELS,
    // Equalizer
    EqBandId, EqualizerSettings, EQ_BAND_COUNT, MAX_GAIN_DB, MIN_GAIN_DB,
    // Frequency policy
    FrequencyRange, HertzRange, RangePolicy, CANINE_HEARING_POLICY,
    // Settings
    AudioSettings,
    // Scenes
    Scene, SceneMood,
};
