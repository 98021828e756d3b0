//! Per-buffer quality measurement
//!
//! The composite score (0-100) is the sum of three components:
//! - dynamic range (0-40): rewards spread between peak and RMS
//! - consistency (0-30): rewards RMS staying close to the peak
//! - level (0-30): rewards RMS near the optimal mid-scale level
//!
//! The first two pull in opposite directions: a buffer scores
//! well when it has some headroom without being spiky.

use std::fmt;

/// RMS level (0-1 full scale) that earns the full level score
pub const OPTIMAL_RMS_LEVEL: f32 = 0.5;

const DYNAMIC_RANGE_MAX: f32 = 40.0;
const CONSISTENCY_MAX: f32 = 30.0;
const LEVEL_MAX: f32 = 30.0;

/// Quality reading for one buffer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QualityMeasurement {
    /// Root-mean-square of absolute sample magnitude
    pub rms: f32,
    /// Largest absolute sample magnitude
    pub peak: f32,
    /// Composite score, 0-100
    pub score: f32,
}

impl fmt::Display for QualityMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RMS: {:.3}, Peak: {:.3}, Quality: {:.1}/100",
            self.rms, self.peak, self.score
        )
    }
}

/// Stateless scorer for interleaved sample buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    /// Measure a buffer
    ///
    /// Non-finite samples are ignored. An empty or silent buffer yields all
    /// zeros, never an error.
    pub fn measure(samples: &[f32]) -> QualityMeasurement {
        let mut sum_squares = 0.0_f64;
        let mut peak = 0.0_f32;
        let mut count = 0_usize;

        for &sample in samples {
            if !sample.is_finite() {
                continue;
            }
            let magnitude = sample.abs();
            sum_squares += f64::from(magnitude) * f64::from(magnitude);
            peak = peak.max(magnitude);
            count += 1;
        }

        let rms = if count == 0 {
            0.0
        } else {
            (sum_squares / count as f64).sqrt() as f32
        };

        QualityMeasurement {
            rms,
            peak,
            score: Self::score(rms, peak),
        }
    }

    /// Composite score from RMS and peak
    pub fn score(rms: f32, peak: f32) -> f32 {
        Self::dynamic_range_score(rms, peak) + Self::consistency_score(rms, peak) + Self::level_score(rms)
    }

    /// 0-40, grows with the relative spread between peak and RMS
    pub fn dynamic_range_score(rms: f32, peak: f32) -> f32 {
        if peak <= 0.0 {
            return 0.0;
        }
        let spread = ((peak - rms) / peak).clamp(0.0, 1.0);
        (spread * 2.0 * DYNAMIC_RANGE_MAX).min(DYNAMIC_RANGE_MAX)
    }

    /// 0-30, shrinks as the spread grows relative to the peak
    pub fn consistency_score(rms: f32, peak: f32) -> f32 {
        if peak <= 0.0 {
            return 0.0;
        }
        let spread = ((peak - rms) / peak).clamp(0.0, 1.0);
        CONSISTENCY_MAX * (1.0 - spread)
    }

    /// 0-30, highest at [`OPTIMAL_RMS_LEVEL`]
    pub fn level_score(rms: f32) -> f32 {
        let distance = (rms - OPTIMAL_RMS_LEVEL).abs() / OPTIMAL_RMS_LEVEL;
        LEVEL_MAX * (1.0 - distance).max(0.0)
    }
}
