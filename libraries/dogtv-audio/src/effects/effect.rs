/// Audio effect trait shared by all pipeline stages
///
/// Every stage operates in place on interleaved f32 samples in [-1.0, 1.0].
/// Stages never change the number of samples they are given.
use crate::error::Result;
use dogtv_core::AudioFormat;

/// Trait for audio effects that can be chained together
///
/// # Safety
/// - Must NOT allocate memory in `process()` (real-time constraint)
/// - Must be Send to allow multi-threaded audio processing
pub trait AudioEffect: Send {
    /// Prepare for a stream format
    ///
    /// Allocates whatever the effect needs (delay lines, coefficient tables).
    /// Called from the control side before processing starts; not real-time safe.
    fn prepare(&mut self, format: AudioFormat) -> Result<()>;

    /// Process audio buffer in-place
    ///
    /// # Arguments
    /// * `buffer` - Interleaved samples (frame after frame)
    /// * `format` - Format of `buffer`, the one passed to `prepare`
    ///
    /// # Real-Time Constraints
    /// - No allocations
    /// - No blocking operations
    /// - Deterministic execution time
    fn process(&mut self, buffer: &mut [f32], format: AudioFormat);

    /// Reset effect state (e.g., when a scene loops or changes)
    fn reset(&mut self);

    /// Enable/disable the effect (disabled = bypass)
    fn set_enabled(&mut self, enabled: bool);

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Get effect name (for debugging)
    fn name(&self) -> &str;
}

/// Convert decibels to linear gain
#[inline]
pub(crate) fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear magnitude to decibels (floored at -200 dB)
#[inline]
pub(crate) fn linear_to_db(linear: f32) -> f32 {
    if linear > 1e-10 {
        20.0 * linear.log10()
    } else {
        -200.0
    }
}

/// One-pole smoothing coefficient for a time constant in milliseconds
///
/// `coeff = exp(-1 / (time_ms * sample_rate / 1000))` reaches 63.2% of a
/// step after `time_ms`.
#[inline]
pub(crate) fn time_constant_coeff(time_ms: f32, sample_rate: u32) -> f32 {
    let samples = time_ms * sample_rate as f32 / 1000.0;
    if samples <= 0.0 {
        0.0
    } else {
        (-1.0 / samples).exp()
    }
}
