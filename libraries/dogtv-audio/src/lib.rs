//! DogTV+ Audio
//!
//! Canine-optimized audio processing for DogTV+ scenes.
//!
//! This crate provides:
//! - DSP stages: 5-band equalizer, canine band filter, compressor, noise gate, reverb
//! - A pipeline graph with a switchable stage order and per-stage bypass
//! - A lock-free control channel from the UI thread to the audio thread
//! - An audio/visual synchronization clock
//!
//! # Example: Processing a scene
//!
//! ```rust
//! use dogtv_audio::AudioPipeline;
//! use dogtv_analytics::AudioAnalytics;
//! use dogtv_core::{AudioBuffer, AudioFormat, AudioSettings, Scene};
//!
//! let format = AudioFormat::stereo_48k();
//! let mut pipeline = AudioPipeline::new(format, AudioSettings::default(), AudioAnalytics::new())?;
//! pipeline.optimize_pipeline_order();
//! pipeline.apply_scene(Scene::Ocean);
//!
//! // Settings changes from another thread go through the controller
//! let controller = pipeline.controller();
//! controller.bypass_pipeline(false)?;
//!
//! let mut buffer = AudioBuffer::silence(480, format);
//! pipeline.process(&mut buffer)?;
//!
//! let stats = pipeline.analytics().statistics();
//! assert_eq!(stats.scene_play_counts["ocean"], 1);
//! # Ok::<(), dogtv_audio::AudioError>(())
//! ```
//!
//! # Example: Sync clock
//!
//! ```rust
//! use dogtv_audio::SyncClock;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(SyncClock::new());
//! clock.start();
//! assert!(clock.is_synchronized());
//! clock.stop();
//! ```

#![forbid(unsafe_code)]

pub mod effects;
mod error;
pub mod pipeline;
pub mod sync;

pub use error::{AudioError, Result};
pub use pipeline::{
    AudioPipeline, PipelineCommand, PipelineController, StageKind, StageOrder, StageParameters,
};
pub use sync::{ClockSource, ManualClock, MonotonicClock, SyncClock, DEFAULT_SYNC_TOLERANCE};
