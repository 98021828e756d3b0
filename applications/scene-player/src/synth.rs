//! Synthetic scene signals
//!
//! Each scene gets a few sine layers spread across the canine hearing
//! ranges, optionally with a seeded noise bed standing in for the nature
//! sound layer. The output is deterministic for a given seed.

use dogtv_core::{AudioFormat, Scene};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// `(frequency_hz, amplitude)` layers for a scene
fn layers(scene: Scene) -> &'static [(f64, f64)] {
    match scene {
        Scene::Ocean => &[(80.0, 0.25), (440.0, 0.1), (14_000.0, 0.05), (28_000.0, 0.08)],
        Scene::Forest => &[(220.0, 0.15), (2_500.0, 0.1), (18_000.0, 0.06), (30_000.0, 0.06)],
        Scene::Rain => &[(150.0, 0.1), (6_000.0, 0.12), (21_000.0, 0.08), (40_000.0, 0.05)],
        Scene::Meadow => &[(330.0, 0.15), (4_000.0, 0.1), (12_000.0, 0.08), (25_000.0, 0.06)],
        Scene::Fireplace => &[(60.0, 0.3), (900.0, 0.1), (16_000.0, 0.05), (22_000.0, 0.05)],
        Scene::Birdsong => &[(3_000.0, 0.12), (7_500.0, 0.12), (19_000.0, 0.08), (35_000.0, 0.08)],
        Scene::Playtime => &[(500.0, 0.15), (5_000.0, 0.12), (24_000.0, 0.1), (50_000.0, 0.08)],
    }
}

/// Amplitude of the noise bed relative to full scale
const NOISE_LEVEL: f32 = 0.05;

/// Streaming generator for one scene
pub struct SceneSynth {
    scene: Scene,
    format: AudioFormat,
    phases: Vec<f64>,
    noise: Option<StdRng>,
}

impl SceneSynth {
    /// Layers above Nyquist are dropped for the given format
    pub fn new(scene: Scene, format: AudioFormat, nature_sounds: bool, seed: u64) -> Self {
        Self {
            scene,
            format,
            phases: vec![0.0; layers(scene).len()],
            noise: nature_sounds.then(|| StdRng::seed_from_u64(seed)),
        }
    }

    /// Fill `block` (interleaved) with the next frames of the scene
    ///
    /// Every channel carries the same tone layers; noise is drawn per sample.
    pub fn fill(&mut self, block: &mut [f32]) {
        let channels = self.format.channel_count();
        let sample_rate = f64::from(self.format.sample_rate.as_hz());
        let nyquist = self.format.sample_rate.nyquist();
        let layers = layers(self.scene);

        for frame in block.chunks_exact_mut(channels) {
            let mut value = 0.0;
            for (&(freq, amp), phase) in layers.iter().zip(self.phases.iter_mut()) {
                if freq >= nyquist {
                    continue;
                }
                value += amp * phase.sin();
                *phase = (*phase + TAU * freq / sample_rate) % TAU;
            }

            for sample in frame {
                let noise = match self.noise.as_mut() {
                    Some(rng) => rng.gen_range(-NOISE_LEVEL..NOISE_LEVEL),
                    None => 0.0,
                };
                *sample = value as f32 + noise;
            }
        }
    }
}
