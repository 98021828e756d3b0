/// Reverb
///
/// Freeverb topology per channel: eight damped feedback combs in parallel,
/// then four series allpass diffusers. Each channel's delay lengths are
/// offset by a fixed spread so the channels decorrelate.
use super::effect::AudioEffect;
use crate::error::{AudioError, Result};
use dogtv_core::AudioFormat;

/// Comb delays in samples at 44.1 kHz
const COMB_TUNING: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass delays in samples at 44.1 kHz
const ALLPASS_TUNING: [usize; 4] = [556, 441, 341, 225];

/// Extra delay per channel index, in samples at 44.1 kHz
const STEREO_SPREAD: usize = 23;

const TUNING_RATE: f32 = 44_100.0;
const FIXED_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;
const ALLPASS_FEEDBACK: f32 = 0.5;
const SCALE_ROOM: f32 = 0.28;
const OFFSET_ROOM: f32 = 0.7;
const SCALE_DAMP: f32 = 0.4;

/// Per-frame step of the wet/dry glide
const MIX_SMOOTH: f32 = 0.002;

/// Reverb settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    /// Wet/dry mix in percent (0 = dry, 100 = fully wet)
    pub wet_dry_mix: f32,

    /// Room size (0.0 - 1.0), sets the comb feedback
    pub room_size: f32,

    /// High-frequency damping in the tail (0.0 - 1.0)
    pub damping: f32,
}

impl ReverbSettings {
    /// 25% mix in a medium room
    pub const fn new() -> Self {
        Self {
            wet_dry_mix: 25.0,
            room_size: 0.6,
            damping: 0.4,
        }
    }

    /// Settings with a given mix and default room
    pub const fn with_mix(wet_dry_mix: f32) -> Self {
        let mut settings = Self::new();
        settings.wet_dry_mix = wet_dry_mix;
        settings
    }

    /// Clamp to valid ranges
    pub fn validate(&mut self) {
        let defaults = Self::new();
        let sane = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        self.wet_dry_mix = sane(self.wet_dry_mix, defaults.wet_dry_mix).clamp(0.0, 100.0);
        self.room_size = sane(self.room_size, defaults.room_size).clamp(0.0, 1.0);
        self.damping = sane(self.damping, defaults.damping).clamp(0.0, 1.0);
    }
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Zeroed delay buffer, reporting allocation failure instead of aborting
fn delay_buffer(len: usize) -> Result<Vec<f32>> {
    let len = len.max(1);
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| AudioError::engine_failed(format!("reverb delay line: {}", e)))?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

#[derive(Debug, Clone)]
struct Comb {
    buffer: Vec<f32>,
    pos: usize,
    filter_store: f32,
}

impl Comb {
    fn new(len: usize) -> Result<Self> {
        Ok(Self {
            buffer: delay_buffer(len)?,
            pos: 0,
            filter_store: 0.0,
        })
    }

    #[inline]
    fn process(&mut self, input: f32, feedback: f32, damp: f32) -> f32 {
        let output = self.buffer[self.pos];
        // One-pole low-pass in the loop darkens the tail
        self.filter_store = output * (1.0 - damp) + self.filter_store * damp;
        if self.filter_store.abs() < 1e-15 {
            self.filter_store = 0.0;
        }
        self.buffer[self.pos] = input + self.filter_store * feedback;
        self.pos = (self.pos + 1) % self.buffer.len();
        output
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
        self.filter_store = 0.0;
    }
}

#[derive(Debug, Clone)]
struct Allpass {
    buffer: Vec<f32>,
    pos: usize,
}

impl Allpass {
    fn new(len: usize) -> Result<Self> {
        Ok(Self {
            buffer: delay_buffer(len)?,
            pos: 0,
        })
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let output = delayed - input;
        self.buffer[self.pos] = input + delayed * ALLPASS_FEEDBACK;
        self.pos = (self.pos + 1) % self.buffer.len();
        output
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

#[derive(Debug, Clone)]
struct ChannelTank {
    combs: Vec<Comb>,
    allpasses: Vec<Allpass>,
}

impl ChannelTank {
    fn new(channel: usize, sample_rate: u32) -> Result<Self> {
        let scale = sample_rate as f32 / TUNING_RATE;
        let scaled = |tuning: usize| ((tuning + STEREO_SPREAD * channel) as f32 * scale).round() as usize;

        let combs = COMB_TUNING
            .iter()
            .map(|&t| Comb::new(scaled(t)))
            .collect::<Result<Vec<_>>>()?;
        let allpasses = ALLPASS_TUNING
            .iter()
            .map(|&t| Allpass::new(scaled(t)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { combs, allpasses })
    }

    #[inline]
    fn process(&mut self, input: f32, feedback: f32, damp: f32) -> f32 {
        let excitation = input * FIXED_GAIN;
        let mut wet = 0.0;
        for comb in &mut self.combs {
            wet += comb.process(excitation, feedback, damp);
        }
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }
        wet * WET_SCALE
    }

    fn reset(&mut self) {
        self.combs.iter_mut().for_each(Comb::reset);
        self.allpasses.iter_mut().for_each(Allpass::reset);
    }
}

/// Reverb stage
pub struct Reverb {
    settings: ReverbSettings,
    enabled: bool,
    tanks: Vec<ChannelTank>,
    format: Option<AudioFormat>,
    mix: f32,
    feedback: f32,
    damp: f32,
}

impl Reverb {
    /// Create a reverb with default settings
    pub fn new() -> Self {
        Self::with_settings(ReverbSettings::new())
    }

    /// Create a reverb with specific settings
    pub fn with_settings(mut settings: ReverbSettings) -> Self {
        settings.validate();
        let mut reverb = Self {
            settings,
            enabled: true,
            tanks: Vec::new(),
            format: None,
            mix: settings.wet_dry_mix / 100.0,
            feedback: 0.0,
            damp: 0.0,
        };
        reverb.update_coefficients();
        reverb
    }

    /// Update settings; the wet/dry mix glides to its new value
    pub fn set_settings(&mut self, mut settings: ReverbSettings) {
        settings.validate();
        self.settings = settings;
        self.update_coefficients();
    }

    /// Set only the wet/dry mix (clamped to 0 - 100)
    pub fn set_wet_dry_mix(&mut self, mix: f32) {
        let mut settings = self.settings;
        settings.wet_dry_mix = mix;
        self.set_settings(settings);
    }

    /// Get current settings
    pub fn settings(&self) -> ReverbSettings {
        self.settings
    }

    fn update_coefficients(&mut self) {
        self.feedback = self.settings.room_size * SCALE_ROOM + OFFSET_ROOM;
        self.damp = self.settings.damping * SCALE_DAMP;
    }

    fn target_mix(&self) -> f32 {
        self.settings.wet_dry_mix / 100.0
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for Reverb {
    fn prepare(&mut self, format: AudioFormat) -> Result<()> {
        let sample_rate = format.sample_rate.as_hz();
        let tanks = (0..format.channel_count())
            .map(|ch| ChannelTank::new(ch, sample_rate))
            .collect::<Result<Vec<_>>>()?;

        self.tanks = tanks;
        self.format = Some(format);
        self.mix = self.target_mix();
        Ok(())
    }

    fn process(&mut self, buffer: &mut [f32], format: AudioFormat) {
        if !self.enabled || self.format != Some(format) {
            return;
        }

        let target = self.target_mix();
        if target == 0.0 && self.mix == 0.0 {
            return;
        }

        for frame in buffer.chunks_exact_mut(format.channel_count()) {
            self.mix += MIX_SMOOTH * (target - self.mix);
            if (target - self.mix).abs() < 1e-6 {
                self.mix = target;
            }
            let mix = self.mix;

            for (sample, tank) in frame.iter_mut().zip(&mut self.tanks) {
                let dry = *sample;
                let wet = tank.process(dry, self.feedback, self.damp);
                *sample = dry * (1.0 - mix) + wet * mix;
            }
        }
    }

    fn reset(&mut self) {
        self.tanks.iter_mut().for_each(ChannelTank::reset);
        self.mix = self.target_mix();
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Reverb"
    }
}
