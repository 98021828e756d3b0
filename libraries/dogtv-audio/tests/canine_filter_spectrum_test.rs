//! Spectral tests for the canine band filter
//!
//! Runs multi-tone signals through the filter and compares per-tone
//! magnitudes with an FFT.

use dogtv_audio::effects::{AudioEffect, CanineBandFilter};
use dogtv_core::{AudioFormat, FrequencyRange, SampleRate};
use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

const FFT_SIZE: usize = 16_384;

fn multi_tone(freqs: &[f32], sample_rate: u32, frames: usize) -> Vec<f32> {
    let scale = 0.9 / freqs.len() as f32;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            freqs.iter().map(|f| (2.0 * PI * f * t).sin()).sum::<f32>() * scale
        })
        .collect()
}

/// Magnitude spectrum of the last FFT_SIZE samples (Hann windowed)
fn spectrum(samples: &[f32]) -> Vec<f32> {
    let tail = &samples[samples.len() - FFT_SIZE..];
    let mut buffer: Vec<Complex<f32>> = tail
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let window = 0.5 * (1.0 - (2.0 * PI * i as f32 / (FFT_SIZE - 1) as f32).cos());
            Complex::new(s * window, 0.0)
        })
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(FFT_SIZE).process(&mut buffer);
    buffer.iter().map(|c| c.norm()).collect()
}

/// Peak magnitude in a few bins around a frequency
fn magnitude_at(spectrum: &[f32], frequency: f32, sample_rate: u32) -> f32 {
    let bin_width = sample_rate as f32 / FFT_SIZE as f32;
    let bin = (frequency / bin_width).round() as usize;
    spectrum[bin.saturating_sub(2)..=(bin + 2).min(FFT_SIZE / 2 - 1)]
        .iter()
        .copied()
        .fold(0.0, f32::max)
}

/// Output/input magnitude ratio for each tone
fn tone_gains(range: FrequencyRange, sample_rate: u32, freqs: &[f32]) -> Vec<f32> {
    let format = AudioFormat::new(SampleRate::new(sample_rate), 1);
    let mut filter = CanineBandFilter::new(range);
    filter.prepare(format).unwrap();

    let input = multi_tone(freqs, sample_rate, FFT_SIZE * 3);
    let mut output = input.clone();
    filter.process(&mut output, format);

    let in_spec = spectrum(&input);
    let out_spec = spectrum(&output);
    freqs
        .iter()
        .map(|&f| magnitude_at(&out_spec, f, sample_rate) / magnitude_at(&in_spec, f, sample_rate))
        .collect()
}

#[test]
fn high_range_at_192k_keeps_band_and_rejects_both_sides() {
    let gains = tone_gains(
        FrequencyRange::High,
        192_000,
        &[1_000.0, 10_000.0, 30_000.0, 80_000.0],
    );
    assert!(gains[0] < 0.001, "1 kHz gain {}", gains[0]);
    assert!(gains[1] < 0.1, "10 kHz gain {}", gains[1]);
    assert!((gains[2] - 1.0).abs() < 0.1, "30 kHz gain {}", gains[2]);
    assert!(gains[3] < 0.15, "80 kHz gain {}", gains[3]);
}

#[test]
fn mid_range_at_48k_is_band_pass() {
    let gains = tone_gains(FrequencyRange::Mid, 48_000, &[2_000.0, 14_000.0, 23_000.0]);
    assert!(gains[0] < 0.01, "2 kHz gain {}", gains[0]);
    assert!(gains[1] > 0.7, "14 kHz gain {}", gains[1]);
    assert!(gains[2] < 0.2, "23 kHz gain {}", gains[2]);
}

#[test]
fn low_range_only_cuts_above_10khz() {
    let gains = tone_gains(FrequencyRange::Low, 48_000, &[100.0, 1_000.0, 5_000.0, 20_000.0]);
    for (gain, freq) in gains.iter().zip(["100 Hz", "1 kHz", "5 kHz"]) {
        assert!((gain - 1.0).abs() < 0.05, "{} gain {}", freq, gain);
    }
    assert!(gains[3] < 0.01, "20 kHz gain {}", gains[3]);
}

#[test]
fn filter_never_boosts_any_tone() {
    let freqs = [500.0, 5_000.0, 12_000.0, 18_000.0, 21_000.0];
    for range in FrequencyRange::ALL {
        for gain in tone_gains(range, 48_000, &freqs) {
            assert!(gain <= 1.05, "{} boosted a tone by {}", range, gain);
        }
    }
}
