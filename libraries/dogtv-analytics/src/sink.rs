/// Analytics sink injected into the pipeline
use dogtv_core::{AudioFormat, Scene};

/// Receives a non-destructive tap of the processed buffer stream
///
/// # Real-Time Constraints
/// `on_buffer` runs on the audio thread after every processed buffer:
/// - No allocations
/// - No blocking operations
pub trait AnalyticsSink: Send {
    /// Observe a processed buffer (interleaved samples)
    fn on_buffer(&mut self, samples: &[f32], format: AudioFormat);

    /// Observe a scene change
    fn on_scene(&mut self, _scene: Scene) {}
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    #[inline]
    fn on_buffer(&mut self, _samples: &[f32], _format: AudioFormat) {}
}
