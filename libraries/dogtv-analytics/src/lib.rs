//! Audio analytics for DogTV+
//!
//! This crate provides:
//! - Per-buffer quality measurement (RMS, peak, composite 0-100 score)
//! - Bounded rolling histories with O(1) eviction, safe on the audio thread
//! - Usage statistics (listening time, sessions, per-scene plays) exported as JSON
//!
//! Analytics are observational only. The pipeline taps processed buffers into
//! an [`AnalyticsSink`] that is handed to it at construction; nothing here
//! feeds back into processing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────────┐
//! │  Pipeline   │ ──► │ AnalyticsSink│ ──► │ AudioUsageStatistics │ ──► JSON
//! └─────────────┘     └──────────────┘     └──────────────────────┘
//!                            │
//!                            ▼
//!                     ┌──────────────┐
//!                     │QualityScorer │
//!                     └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use dogtv_analytics::{AnalyticsSink, AudioAnalytics};
//! use dogtv_core::{AudioFormat, Scene};
//!
//! let mut analytics = AudioAnalytics::new();
//! analytics.start_session();
//! analytics.on_scene(Scene::Ocean);
//! analytics.on_buffer(&[0.25; 960], AudioFormat::stereo_48k());
//!
//! let stats = analytics.statistics();
//! assert_eq!(stats.session_count, 1);
//! assert_eq!(stats.scene_play_counts["ocean"], 1);
//! ```

#![deny(unsafe_code)]

mod error;
mod history;
mod quality;
mod sink;
mod statistics;

pub use error::{AnalyticsError, Result};
pub use history::RollingHistory;
pub use quality::{QualityMeasurement, QualityScorer, OPTIMAL_RMS_LEVEL};
pub use sink::{AnalyticsSink, NoopAnalytics};
pub use statistics::{AudioAnalytics, AudioUsageStatistics};

/// Number of per-buffer volume readings kept for averaging
pub const VOLUME_HISTORY_CAPACITY: usize = 1000;

/// Number of per-buffer quality scores kept for averaging
pub const QUALITY_HISTORY_CAPACITY: usize = 100;
