/// Five-band equalizer
///
/// Low shelf at 60 Hz, peaking bands at 250 Hz, 1 kHz and 4 kHz, high shelf
/// at 12 kHz. Gains come from an already validated `EqualizerSettings`.
use super::biquad::{Biquad, BiquadCoefficients, BUTTERWORTH_Q};
use super::effect::AudioEffect;
use crate::error::Result;
use dogtv_core::{AudioFormat, EqBandId, EqualizerSettings, EQ_BAND_COUNT};

/// Q of the three peaking bands (about 1.4 octaves wide)
const PEAKING_Q: f32 = 1.0;

/// Equalizer stage
pub struct Equalizer {
    settings: EqualizerSettings,
    filters: [Biquad; EQ_BAND_COUNT],
    sample_rate: u32,
    enabled: bool,
}

impl Equalizer {
    /// Create a flat equalizer
    pub fn new() -> Self {
        Self::with_settings(EqualizerSettings::flat())
    }

    /// Create an equalizer with initial gains
    pub fn with_settings(settings: EqualizerSettings) -> Self {
        Self {
            settings,
            filters: std::array::from_fn(|_| Biquad::new()),
            sample_rate: 0,
            enabled: true,
        }
    }

    /// Current gains
    pub fn settings(&self) -> EqualizerSettings {
        self.settings
    }

    /// Apply new gains
    ///
    /// Coefficients glide to the new response over ~10ms.
    pub fn apply_settings(&mut self, settings: &EqualizerSettings) {
        self.settings = *settings;
        if self.sample_rate > 0 {
            for band in EqBandId::ALL {
                let coeffs = self.band_coefficients(band);
                self.filters[band.index()].set_target(coeffs);
            }
        }
    }

    fn band_coefficients(&self, band: EqBandId) -> BiquadCoefficients {
        let sr = self.sample_rate as f32;
        let gain = self.settings.gain(band);
        let freq = band.center_hz();
        match band {
            EqBandId::Low => BiquadCoefficients::low_shelf(sr, freq, BUTTERWORTH_Q, gain),
            EqBandId::High => BiquadCoefficients::high_shelf(sr, freq, BUTTERWORTH_Q, gain),
            EqBandId::LowMid | EqBandId::Mid | EqBandId::HighMid => {
                BiquadCoefficients::peaking(sr, freq, PEAKING_Q, gain)
            }
        }
    }
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for Equalizer {
    fn prepare(&mut self, format: AudioFormat) -> Result<()> {
        self.sample_rate = format.sample_rate.as_hz();
        for band in EqBandId::ALL {
            let coeffs = self.band_coefficients(band);
            self.filters[band.index()].snap_to(coeffs);
        }
        for filter in &mut self.filters {
            filter.reset();
        }
        Ok(())
    }

    fn process(&mut self, buffer: &mut [f32], format: AudioFormat) {
        if !self.enabled || self.sample_rate == 0 {
            return;
        }

        // Skip bands that are and will stay flat
        let mut active = [false; EQ_BAND_COUNT];
        for (flag, filter) in active.iter_mut().zip(&self.filters) {
            *flag = !filter.is_identity();
        }
        if !active.contains(&true) {
            return;
        }

        let channels = format.channel_count();
        for frame in buffer.chunks_exact_mut(channels) {
            for (filter, _) in self.filters.iter_mut().zip(active).filter(|(_, on)| *on) {
                filter.smooth();
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample = filter.process_sample(ch, *sample);
                }
            }
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Equalizer"
    }
}
