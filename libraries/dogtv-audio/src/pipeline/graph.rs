//! The pipeline graph: owns every stage and runs them in order

use super::control::{PipelineCommand, PipelineController, CONTROL_QUEUE_CAPACITY};
use super::output::OutputStage;
use super::preset::StageParameters;
use super::stage::{StageKind, StageOrder};
use crate::effects::{AudioEffect, CanineBandFilter, Compressor, Equalizer, NoiseGate, Reverb};
use crate::error::{AudioError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use dogtv_analytics::{AnalyticsSink, NoopAnalytics};
use dogtv_core::{AudioBuffer, AudioFormat, AudioSettings, Scene};
use tracing::{debug, info};

/// Canine-optimized processing pipeline
///
/// Built for one stream format. After construction `process` performs no
/// allocation: parameter changes arrive either through `&mut self` methods
/// or as queued commands from a [`PipelineController`].
///
/// # Example
///
/// ```rust
/// use dogtv_audio::AudioPipeline;
/// use dogtv_analytics::NoopAnalytics;
/// use dogtv_core::{AudioBuffer, AudioFormat, AudioSettings};
///
/// let format = AudioFormat::stereo_48k();
/// let mut pipeline = AudioPipeline::new(format, AudioSettings::default(), NoopAnalytics)?;
/// pipeline.optimize_pipeline_order();
///
/// let mut buffer = AudioBuffer::silence(480, format);
/// pipeline.process(&mut buffer)?;
/// assert_eq!(buffer.frames(), 480);
/// # Ok::<(), dogtv_audio::AudioError>(())
/// ```
pub struct AudioPipeline<A: AnalyticsSink = NoopAnalytics> {
    format: AudioFormat,
    settings: AudioSettings,
    parameters: StageParameters,
    order: StageOrder,

    equalizer: Equalizer,
    canine_filter: CanineBandFilter,
    compressor: Compressor,
    noise_gate: NoiseGate,
    reverb: Reverb,
    output: OutputStage,

    analytics: A,

    command_tx: Sender<PipelineCommand>,
    command_rx: Receiver<PipelineCommand>,
}

impl<A: AnalyticsSink> AudioPipeline<A> {
    /// Build and prepare every stage for `format`
    ///
    /// Fails with [`AudioError::EngineFailed`] when the format is unsupported
    /// or a stage cannot be prepared.
    pub fn new(format: AudioFormat, settings: AudioSettings, analytics: A) -> Result<Self> {
        format
            .validate()
            .map_err(|e| AudioError::engine_failed(e.to_string()))?;

        let parameters = StageParameters::default();
        let (command_tx, command_rx) = bounded(CONTROL_QUEUE_CAPACITY);

        let mut pipeline = Self {
            format,
            settings,
            parameters,
            order: StageOrder::DEFAULT,
            equalizer: Equalizer::with_settings(settings.equalizer),
            canine_filter: CanineBandFilter::new(settings.frequency_range),
            compressor: Compressor::with_settings(parameters.compressor),
            noise_gate: NoiseGate::with_settings(parameters.noise_gate),
            reverb: Reverb::with_settings(parameters.reverb),
            output: OutputStage::new(settings.output_gain()),
            analytics,
            command_tx,
            command_rx,
        };

        for kind in StageKind::ALL {
            let stage = pipeline.stage_mut(kind);
            let name = stage.name().to_string();
            stage
                .prepare(format)
                .map_err(|e| AudioError::engine_failed(format!("{}: {}", name, e)))?;
        }

        info!(
            %format,
            range = %settings.frequency_range,
            order = %pipeline.order,
            "Audio pipeline ready"
        );
        Ok(pipeline)
    }

    /// Process a buffer in place
    ///
    /// The buffer must carry the format the pipeline was built for.
    pub fn process(&mut self, buffer: &mut AudioBuffer) -> Result<()> {
        if buffer.format != self.format {
            return Err(AudioError::FormatMismatch {
                expected: self.format,
                actual: buffer.format,
            });
        }
        self.process_samples(&mut buffer.samples)
    }

    /// Process interleaved samples in the pipeline's format
    ///
    /// Frame and channel count are preserved. When every stage is bypassed
    /// the samples come back untouched.
    pub fn process_samples(&mut self, samples: &mut [f32]) -> Result<()> {
        let channels = self.format.channel_count();
        if samples.is_empty() {
            return Err(AudioError::invalid_buffer("buffer has no frames"));
        }
        if samples.len() % channels != 0 {
            return Err(AudioError::invalid_buffer(format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                channels
            )));
        }

        self.drain_commands();

        if !self.is_bypassed() {
            let format = self.format;
            for kind in self.order.stages() {
                let stage = self.stage_mut(kind);
                if stage.is_enabled() {
                    stage.process(samples, format);
                }
            }
            self.output.process(samples, channels);
        }

        self.analytics.on_buffer(samples, self.format);
        Ok(())
    }

    /// Swap in new user settings
    ///
    /// Equalizer gains and volume glide to their new values; a new frequency
    /// range applies at once. The stage order is left alone.
    pub fn update_settings(&mut self, settings: AudioSettings) {
        debug!(
            volume = settings.volume(),
            enabled = settings.enabled,
            range = %settings.frequency_range,
            "Updating pipeline settings"
        );
        self.apply_command(PipelineCommand::UpdateSettings(settings));
    }

    /// Load the dynamics and reverb preset for a scene and record the play
    pub fn apply_scene(&mut self, scene: Scene) {
        info!(%scene, mood = ?scene.mood(), "Applying scene");
        self.apply_command(PipelineCommand::ApplyScene(scene));
    }

    /// Replace the dynamics and reverb tuning
    pub fn set_stage_parameters(&mut self, parameters: StageParameters) {
        debug!(?parameters, "Setting stage parameters");
        self.apply_command(PipelineCommand::SetStageParameters(parameters));
    }

    /// Switch to [`StageOrder::OPTIMIZED`]. Idempotent.
    pub fn optimize_pipeline_order(&mut self) {
        if !self.order.is_optimized() {
            info!(from = %self.order, to = %StageOrder::OPTIMIZED, "Optimizing stage order");
        }
        self.apply_command(PipelineCommand::OptimizeOrder);
    }

    pub fn set_stage_order(&mut self, order: StageOrder) {
        info!(%order, "Setting stage order");
        self.apply_command(PipelineCommand::SetOrder(order));
    }

    pub fn stage_order(&self) -> StageOrder {
        self.order
    }

    /// Bypass (or restore) every stage at once
    pub fn bypass_pipeline(&mut self, bypass: bool) {
        info!(bypass, "Pipeline bypass");
        self.apply_command(PipelineCommand::BypassAll(bypass));
    }

    pub fn set_stage_bypass(&mut self, stage: StageKind, bypass: bool) {
        debug!(%stage, bypass, "Stage bypass");
        self.apply_command(PipelineCommand::BypassStage(stage, bypass));
    }

    pub fn is_stage_bypassed(&self, stage: StageKind) -> bool {
        !self.stage(stage).is_enabled()
    }

    /// Whether every stage is bypassed
    pub fn is_bypassed(&self) -> bool {
        StageKind::ALL.iter().all(|&kind| self.is_stage_bypassed(kind))
    }

    /// Clear filter memory, envelopes and reverb tails
    pub fn reset(&mut self) {
        debug!("Resetting pipeline state");
        self.apply_command(PipelineCommand::Reset);
    }

    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    pub fn stage_parameters(&self) -> StageParameters {
        self.parameters
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn analytics(&self) -> &A {
        &self.analytics
    }

    pub fn analytics_mut(&mut self) -> &mut A {
        &mut self.analytics
    }

    /// Consume the pipeline, keeping the collected analytics
    pub fn into_analytics(self) -> A {
        self.analytics
    }

    /// Handle for queuing changes from another thread
    pub fn controller(&self) -> PipelineController {
        PipelineController::new(self.command_tx.clone())
    }

    fn stage(&self, kind: StageKind) -> &dyn AudioEffect {
        match kind {
            StageKind::Equalizer => &self.equalizer,
            StageKind::CanineFilter => &self.canine_filter,
            StageKind::Compressor => &self.compressor,
            StageKind::NoiseGate => &self.noise_gate,
            StageKind::Reverb => &self.reverb,
        }
    }

    fn stage_mut(&mut self, kind: StageKind) -> &mut dyn AudioEffect {
        match kind {
            StageKind::Equalizer => &mut self.equalizer,
            StageKind::CanineFilter => &mut self.canine_filter,
            StageKind::Compressor => &mut self.compressor,
            StageKind::NoiseGate => &mut self.noise_gate,
            StageKind::Reverb => &mut self.reverb,
        }
    }

    // Runs on the audio thread: no logging, no allocation
    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: PipelineCommand) {
        match command {
            PipelineCommand::UpdateSettings(settings) => {
                self.settings = settings;
                self.equalizer.apply_settings(&settings.equalizer);
                self.canine_filter
                    .set_range(settings.frequency_range.hertz_range());
                self.output.set_gain(settings.output_gain());
            }
            PipelineCommand::ApplyScene(scene) => {
                self.apply_parameters(StageParameters::for_scene(scene));
                self.analytics.on_scene(scene);
            }
            PipelineCommand::SetStageParameters(parameters) => {
                self.apply_parameters(parameters);
            }
            PipelineCommand::OptimizeOrder => {
                self.order = StageOrder::OPTIMIZED;
            }
            PipelineCommand::SetOrder(order) => {
                self.order = order;
            }
            PipelineCommand::BypassAll(bypass) => {
                for kind in StageKind::ALL {
                    self.stage_mut(kind).set_enabled(!bypass);
                }
            }
            PipelineCommand::BypassStage(stage, bypass) => {
                self.stage_mut(stage).set_enabled(!bypass);
            }
            PipelineCommand::Reset => {
                for kind in StageKind::ALL {
                    self.stage_mut(kind).reset();
                }
                self.output.settle();
            }
        }
    }

    fn apply_parameters(&mut self, parameters: StageParameters) {
        self.compressor.set_settings(parameters.compressor);
        self.noise_gate.set_settings(parameters.noise_gate);
        self.reverb.set_settings(parameters.reverb);
        // Keep what the stages actually accepted after clamping
        self.parameters = StageParameters {
            compressor: self.compressor.settings(),
            noise_gate: self.noise_gate.settings(),
            reverb: self.reverb.settings(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::tests::{generate_sine, rms};
    use dogtv_core::{EqualizerSettings, FrequencyRange, SampleRate};

    fn pipeline() -> AudioPipeline {
        AudioPipeline::new(AudioFormat::stereo_48k(), AudioSettings::default(), NoopAnalytics)
            .unwrap()
    }

    #[test]
    fn starts_with_default_order() {
        let p = pipeline();
        assert_eq!(p.stage_order(), StageOrder::DEFAULT);
        assert!(!p.is_bypassed());
    }

    #[test]
    fn unsupported_format_fails() {
        let format = AudioFormat::new(SampleRate::new(1_000), 2);
        let result = AudioPipeline::new(format, AudioSettings::default(), NoopAnalytics);
        assert!(matches!(result, Err(AudioError::EngineFailed(_))));

        let format = AudioFormat::new(SampleRate::DVD_QUALITY, 0);
        let result = AudioPipeline::new(format, AudioSettings::default(), NoopAnalytics);
        assert!(matches!(result, Err(AudioError::EngineFailed(_))));
    }

    #[test]
    fn rejects_misaligned_and_empty_buffers() {
        let mut p = pipeline();
        assert!(matches!(
            p.process_samples(&mut []),
            Err(AudioError::InvalidBuffer(_))
        ));
        assert!(matches!(
            p.process_samples(&mut [0.0; 3]),
            Err(AudioError::InvalidBuffer(_))
        ));
    }

    #[test]
    fn rejects_foreign_format() {
        let mut p = pipeline();
        let mut buffer = AudioBuffer::silence(64, AudioFormat::new(SampleRate::CD_QUALITY, 2));
        assert!(matches!(
            p.process(&mut buffer),
            Err(AudioError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn bypass_is_identity() {
        let mut p = pipeline();
        p.bypass_pipeline(true);
        assert!(p.is_bypassed());

        let input = generate_sine(440.0, 48_000, 0.1, 2);
        let mut samples = input.clone();
        p.process_samples(&mut samples).unwrap();
        assert_eq!(samples, input);
    }

    #[test]
    fn single_stage_bypass() {
        let mut p = pipeline();
        p.set_stage_bypass(StageKind::Reverb, true);
        assert!(p.is_stage_bypassed(StageKind::Reverb));
        assert!(!p.is_stage_bypassed(StageKind::Equalizer));
        assert!(!p.is_bypassed());
    }

    #[test]
    fn settings_update_keeps_order() {
        let mut p = pipeline();
        p.optimize_pipeline_order();
        let settings = AudioSettings::default()
            .with_frequency_range(FrequencyRange::Low)
            .with_equalizer(EqualizerSettings::three_band(3.0, 0.0, -3.0).unwrap());
        p.update_settings(settings);
        assert_eq!(p.settings(), settings);
        assert!(p.stage_order().is_optimized());
    }

    #[test]
    fn scene_changes_reverb_mix() {
        let mut p = pipeline();
        p.apply_scene(Scene::Fireplace);
        assert_eq!(p.stage_parameters().reverb.wet_dry_mix, 40.0);
        p.apply_scene(Scene::Playtime);
        assert_eq!(p.stage_parameters().reverb.wet_dry_mix, 10.0);
    }

    #[test]
    fn queued_commands_apply_before_next_buffer() {
        let mut p = pipeline();
        let controller = p.controller();
        controller.optimize_pipeline_order().unwrap();
        controller.set_stage_bypass(StageKind::Compressor, true).unwrap();
        assert_eq!(p.stage_order(), StageOrder::DEFAULT);

        let mut samples = vec![0.0; 96];
        p.process_samples(&mut samples).unwrap();
        assert!(p.stage_order().is_optimized());
        assert!(p.is_stage_bypassed(StageKind::Compressor));
        assert_eq!(controller.pending(), 0);
    }

    #[test]
    fn controller_reports_closed_after_drop() {
        let p = pipeline();
        let controller = p.controller();
        drop(p);
        assert_eq!(controller.reset(), Err(AudioError::PipelineClosed));
    }

    #[test]
    fn disabled_output_is_silent() {
        let settings = AudioSettings::default()
            .with_enabled(false)
            .with_frequency_range(FrequencyRange::Low);
        let mut p =
            AudioPipeline::new(AudioFormat::stereo_48k(), settings, NoopAnalytics).unwrap();
        let mut samples = generate_sine(440.0, 48_000, 0.1, 2);
        p.process_samples(&mut samples).unwrap();
        assert_eq!(rms(&samples), 0.0);
    }
}
