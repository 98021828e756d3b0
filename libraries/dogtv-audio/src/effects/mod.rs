//! DSP stages of the canine audio pipeline
//!
//! All effects operate in place on interleaved f32 samples in [-1.0, 1.0]
//! and never change the sample count.
//!
//! Available effects:
//! - **Equalizer**: 5-band shelf/peaking equalizer
//! - **CanineBandFilter**: 4th-order Butterworth band limiter for a canine hearing range
//! - **Compressor**: Headroom-driven dynamic range compressor
//! - **NoiseGate**: Channel-linked gate with attack/release ramps
//! - **Reverb**: Freeverb-style comb/allpass reverb

mod biquad;
mod canine_filter;
mod compressor;
mod effect;
mod eq;
mod noise_gate;
mod reverb;

pub use canine_filter::CanineBandFilter;
pub use compressor::{Compressor, CompressorSettings};
pub use effect::AudioEffect;
pub use eq::Equalizer;
pub use noise_gate::{NoiseGate, NoiseGateSettings};
pub use reverb::{Reverb, ReverbSettings};

#[cfg(test)]
pub(crate) mod tests {
    /// Generate an interleaved sine with the same signal on every channel
    pub(crate) fn generate_sine(
        freq: f32,
        sample_rate: u32,
        duration_secs: f32,
        channels: usize,
    ) -> Vec<f32> {
        let num_frames = (sample_rate as f32 * duration_secs) as usize;
        let mut samples = Vec::with_capacity(num_frames * channels);

        for i in 0..num_frames {
            let t = i as f32 / sample_rate as f32;
            let sample = (2.0 * std::f32::consts::PI * freq * t).sin();
            samples.extend(std::iter::repeat(sample).take(channels));
        }

        samples
    }

    pub(crate) fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    pub(crate) fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}
