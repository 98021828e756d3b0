//! Audio Pipeline
//!
//! Composes the five DSP stages into one graph with a configurable order,
//! per-stage bypass and a lock-free control channel.
//!
//! # Architecture
//!
//! ```text
//! PipelineController ──(bounded queue)──┐
//!                                       v
//! input ─> [stage]* in StageOrder ─> OutputStage ─> AnalyticsSink
//!                                   (volume, mute, clamp)
//! ```

mod control;
mod graph;
mod output;
mod preset;
mod stage;

pub use control::{PipelineCommand, PipelineController, CONTROL_QUEUE_CAPACITY};
pub use graph::AudioPipeline;
pub use preset::StageParameters;
pub use stage::{StageKind, StageOrder};
