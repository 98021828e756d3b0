/// Scene player configuration
use crate::error::{PlayerError, Result};
use dogtv_core::{AudioFormat, AudioSettings, SampleRate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest block the renderer will hand to the pipeline in one call
const MAX_BLOCK_FRAMES: usize = 65_536;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// User-facing audio settings, validated on load
    #[serde(default)]
    pub audio: AudioSettings,

    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_channels")]
    pub channels: u16,

    #[serde(default = "default_block_frames")]
    pub block_frames: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineSettings {
    /// Run stages in the optimized order instead of the legacy one
    #[serde(default = "default_optimize_order")]
    pub optimize_order: bool,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `dogtv.toml` in the working directory; a missing
    /// default file is not an error. Environment variables override the file,
    /// e.g. `DOGTV_ENGINE__SAMPLE_RATE=96000` or `DOGTV_AUDIO__VOLUME=0.5`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("dogtv.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("DOGTV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(settings)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// Audio settings are already checked during deserialization; this
    /// covers the engine section.
    pub fn validate(&self) -> Result<()> {
        self.format().validate()?;

        if self.engine.block_frames == 0 || self.engine.block_frames > MAX_BLOCK_FRAMES {
            return Err(PlayerError::Engine(format!(
                "block_frames {} (must be 1-{})",
                self.engine.block_frames, MAX_BLOCK_FRAMES
            )));
        }

        Ok(())
    }

    /// Stream format the pipeline is built for
    pub fn format(&self) -> AudioFormat {
        AudioFormat::new(SampleRate::new(self.engine.sample_rate), self.engine.channels)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            block_frames: default_block_frames(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            optimize_order: default_optimize_order(),
        }
    }
}

// Default values
fn default_sample_rate() -> u32 {
    SampleRate::DVD_QUALITY.as_hz()
}

fn default_channels() -> u16 {
    2
}

fn default_block_frames() -> usize {
    512
}

fn default_optimize_order() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogtv_core::{EqBandId, FrequencyRange};
    use std::io::Write;

    fn from_toml(toml: &str) -> Result<PlayerConfig> {
        PlayerConfig::from_builder(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.audio, AudioSettings::default());
        assert_eq!(config.format(), AudioFormat::stereo_48k());
        assert_eq!(config.engine.block_frames, 512);
        assert!(config.pipeline.optimize_order);
    }

    #[test]
    fn parses_every_section() {
        let config = from_toml(
            r#"
            [audio]
            volume = 0.5
            frequency_range = "mid"

            [audio.equalizer]
            low = 3.0
            high = -6.0

            [engine]
            sample_rate = 96000
            channels = 1
            block_frames = 256

            [pipeline]
            optimize_order = false
            "#,
        )
        .unwrap();

        assert_eq!(config.audio.volume(), 0.5);
        assert_eq!(config.audio.frequency_range, FrequencyRange::Mid);
        assert_eq!(config.audio.equalizer.gain(EqBandId::Low), 3.0);
        assert_eq!(config.audio.equalizer.gain(EqBandId::High), -6.0);
        assert_eq!(config.engine.sample_rate, 96_000);
        assert_eq!(config.engine.channels, 1);
        assert!(!config.pipeline.optimize_order);
    }

    #[test]
    fn out_of_range_gain_is_rejected() {
        let result = from_toml("[audio.equalizer]\nmid = 20.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_volume_is_rejected() {
        assert!(from_toml("[audio]\nvolume = 1.5\n").is_err());
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let err = from_toml("[engine]\nchannels = 0\n").unwrap_err();
        assert!(matches!(err, PlayerError::Settings(_)), "{err}");
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let err = from_toml("[engine]\nblock_frames = 0\n").unwrap_err();
        assert!(matches!(err, PlayerError::Engine(_)), "{err}");
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine]\nsample_rate = 44100").unwrap();

        let config = PlayerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.engine.sample_rate, 44_100);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PlayerConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(PlayerError::Config(_))));
    }
}
