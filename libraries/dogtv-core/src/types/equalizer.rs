//! Equalizer settings
//!
//! Five fixed-frequency bands with validated decibel gains. The three-band
//! layout (low / mid / high) is the same model with the two intermediate
//! bands left flat.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Number of equalizer bands
pub const EQ_BAND_COUNT: usize = 5;

/// Lowest accepted band gain in dB
pub const MIN_GAIN_DB: f32 = -12.0;

/// Highest accepted band gain in dB
pub const MAX_GAIN_DB: f32 = 12.0;

/// Identifies one of the fixed equalizer bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqBandId {
    /// Low shelf at 60 Hz
    Low,
    /// Peaking at 250 Hz
    LowMid,
    /// Peaking at 1 kHz
    Mid,
    /// Peaking at 4 kHz
    HighMid,
    /// High shelf at 12 kHz
    High,
}

impl EqBandId {
    /// All bands, lowest first
    pub const ALL: [Self; EQ_BAND_COUNT] = [
        Self::Low,
        Self::LowMid,
        Self::Mid,
        Self::HighMid,
        Self::High,
    ];

    /// Position of the band in gain arrays
    pub fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::LowMid => 1,
            Self::Mid => 2,
            Self::HighMid => 3,
            Self::High => 4,
        }
    }

    /// Centre (or corner, for the shelves) frequency in Hz
    pub fn center_hz(self) -> f32 {
        match self {
            Self::Low => 60.0,
            Self::LowMid => 250.0,
            Self::Mid => 1_000.0,
            Self::HighMid => 4_000.0,
            Self::High => 12_000.0,
        }
    }

    /// Band name as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::LowMid => "low_mid",
            Self::Mid => "mid",
            Self::HighMid => "high_mid",
            Self::High => "high",
        }
    }
}

/// Check a single band gain
fn validate_gain(band: EqBandId, gain_db: f32) -> Result<f32> {
    if gain_db.is_finite() && (MIN_GAIN_DB..=MAX_GAIN_DB).contains(&gain_db) {
        Ok(gain_db)
    } else {
        Err(ConfigError::InvalidGain {
            band: band.name(),
            gain_db,
        })
    }
}

/// Equalizer band gains
///
/// Gains are private so every construction path goes through validation,
/// including deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "EqualizerGains", into = "EqualizerGains")]
pub struct EqualizerSettings {
    gains: [f32; EQ_BAND_COUNT],
}

impl EqualizerSettings {
    /// All bands at 0 dB
    pub const fn flat() -> Self {
        Self {
            gains: [0.0; EQ_BAND_COUNT],
        }
    }

    /// Create settings from per-band gains, lowest band first
    pub fn new(gains: [f32; EQ_BAND_COUNT]) -> Result<Self> {
        for band in EqBandId::ALL {
            validate_gain(band, gains[band.index()])?;
        }
        Ok(Self { gains })
    }

    /// Simplified low / mid / high layout
    pub fn three_band(low_db: f32, mid_db: f32, high_db: f32) -> Result<Self> {
        Self::new([low_db, 0.0, mid_db, 0.0, high_db])
    }

    /// Gain of a single band in dB
    pub fn gain(&self, band: EqBandId) -> f32 {
        self.gains[band.index()]
    }

    /// Set the gain of a single band
    ///
    /// Leaves the settings untouched when the gain is rejected.
    pub fn set_gain(&mut self, band: EqBandId, gain_db: f32) -> Result<()> {
        self.gains[band.index()] = validate_gain(band, gain_db)?;
        Ok(())
    }

    /// Builder-style variant of [`set_gain`](Self::set_gain)
    pub fn with_gain(mut self, band: EqBandId, gain_db: f32) -> Result<Self> {
        self.set_gain(band, gain_db)?;
        Ok(self)
    }

    /// All gains, lowest band first
    pub fn gains(&self) -> [f32; EQ_BAND_COUNT] {
        self.gains
    }

    /// Whether every band is at 0 dB
    pub fn is_flat(&self) -> bool {
        self.gains.iter().all(|&g| g == 0.0)
    }
}

/// Serialized form of [`EqualizerSettings`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct EqualizerGains {
    low: f32,
    low_mid: f32,
    mid: f32,
    high_mid: f32,
    high: f32,
}

impl TryFrom<EqualizerGains> for EqualizerSettings {
    type Error = ConfigError;

    fn try_from(raw: EqualizerGains) -> Result<Self> {
        Self::new([raw.low, raw.low_mid, raw.mid, raw.high_mid, raw.high])
    }
}

impl From<EqualizerSettings> for EqualizerGains {
    fn from(settings: EqualizerSettings) -> Self {
        let [low, low_mid, mid, high_mid, high] = settings.gains;
        Self {
            low,
            low_mid,
            mid,
            high_mid,
            high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_is_default() {
        assert_eq!(EqualizerSettings::default(), EqualizerSettings::flat());
        assert!(EqualizerSettings::flat().is_flat());
    }

    #[test]
    fn accepts_bounds() {
        let eq = EqualizerSettings::new([-12.0, 12.0, 0.0, 6.5, -3.0]).unwrap();
        assert_eq!(eq.gain(EqBandId::Low), -12.0);
        assert_eq!(eq.gain(EqBandId::LowMid), 12.0);
    }

    #[test]
    fn rejects_out_of_range() {
        let err = EqualizerSettings::new([0.0, 0.0, 12.5, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidGain {
                band: "mid",
                gain_db: 12.5
            }
        );
        assert!(EqualizerSettings::three_band(-13.0, 0.0, 0.0).is_err());
        assert!(EqualizerSettings::three_band(0.0, f32::NAN, 0.0).is_err());
    }

    #[test]
    fn three_band_leaves_intermediate_bands_flat() {
        let eq = EqualizerSettings::three_band(4.0, -2.0, 1.0).unwrap();
        assert_eq!(eq.gains(), [4.0, 0.0, -2.0, 0.0, 1.0]);
    }

    #[test]
    fn set_gain_rejects_and_keeps_previous_value() {
        let mut eq = EqualizerSettings::flat();
        eq.set_gain(EqBandId::High, 5.0).unwrap();
        assert!(eq.set_gain(EqBandId::High, 20.0).is_err());
        assert_eq!(eq.gain(EqBandId::High), 5.0);
    }

    #[test]
    fn deserialization_validates() {
        let ok: EqualizerSettings = serde_json::from_str(r#"{"low": 3.0, "high": -2.0}"#).unwrap();
        assert_eq!(ok.gains(), [3.0, 0.0, 0.0, 0.0, -2.0]);

        let bad = serde_json::from_str::<EqualizerSettings>(r#"{"mid": 40.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn band_ids_are_ordered_by_frequency() {
        let centers: Vec<f32> = EqBandId::ALL.iter().map(|b| b.center_hz()).collect();
        assert!(centers.windows(2).all(|w| w[0] < w[1]));
        for (i, band) in EqBandId::ALL.iter().enumerate() {
            assert_eq!(band.index(), i);
        }
    }
}
