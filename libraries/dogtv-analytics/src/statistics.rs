//! Usage statistics
//!
//! [`AudioAnalytics`] is the stateful [`AnalyticsSink`] the pipeline taps.
//! Everything it touches from `on_buffer` / `on_scene` is pre-allocated, so
//! it is safe to run on the audio thread. [`AudioAnalytics::statistics`]
//! builds an owned snapshot for export and is meant for control-side callers.

use crate::error::Result;
use crate::history::RollingHistory;
use crate::quality::{QualityMeasurement, QualityScorer};
use crate::sink::AnalyticsSink;
use crate::{QUALITY_HISTORY_CAPACITY, VOLUME_HISTORY_CAPACITY};
use chrono::{DateTime, Utc};
use dogtv_core::{AudioFormat, Scene};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Exported snapshot of listening behaviour and audio quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioUsageStatistics {
    /// Seconds of audio processed
    pub total_listening_time_secs: f64,
    /// Sessions started
    pub session_count: u64,
    /// Mean RMS over the volume history
    pub average_volume: f32,
    /// Largest sample magnitude seen
    pub peak_volume: f32,
    /// Mean quality score over the quality history
    pub quality_score: f32,
    /// Plays per scene id (scenes never played are omitted)
    pub scene_play_counts: BTreeMap<String, u64>,
    /// When the snapshot was taken
    pub generated_at: DateTime<Utc>,
}

impl AudioUsageStatistics {
    /// Serialize to a JSON string for an external analytics sink
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Running analytics state
#[derive(Debug, Clone)]
pub struct AudioAnalytics {
    volume_history: RollingHistory,
    quality_history: RollingHistory,
    peak_volume: f32,
    total_listening_secs: f64,
    session_count: u64,
    session_active: bool,
    scene_plays: [u64; Scene::COUNT],
    current_scene: Option<Scene>,
    last_measurement: Option<QualityMeasurement>,
}

impl AudioAnalytics {
    /// Create analytics with the default history sizes
    pub fn new() -> Self {
        Self::with_capacity(VOLUME_HISTORY_CAPACITY, QUALITY_HISTORY_CAPACITY)
    }

    /// Create analytics with custom history sizes
    pub fn with_capacity(volume_capacity: usize, quality_capacity: usize) -> Self {
        Self {
            volume_history: RollingHistory::new(volume_capacity),
            quality_history: RollingHistory::new(quality_capacity),
            peak_volume: 0.0,
            total_listening_secs: 0.0,
            session_count: 0,
            session_active: false,
            scene_plays: [0; Scene::COUNT],
            current_scene: None,
            last_measurement: None,
        }
    }

    /// Begin a listening session
    pub fn start_session(&mut self) {
        self.session_count += 1;
        self.session_active = true;
        info!(session = self.session_count, "Audio session started");
    }

    /// End the current listening session
    pub fn end_session(&mut self) {
        if self.session_active {
            self.session_active = false;
            info!(
                session = self.session_count,
                listening_secs = self.total_listening_secs,
                "Audio session ended"
            );
        }
    }

    /// Whether a session is in progress
    pub fn is_session_active(&self) -> bool {
        self.session_active
    }

    /// Record a scene play
    pub fn track_scene_play(&mut self, scene: Scene) {
        if let Some(slot) = Scene::ALL.iter().position(|s| *s == scene) {
            self.scene_plays[slot] += 1;
        }
        self.current_scene = Some(scene);
    }

    /// Scene most recently played
    pub fn current_scene(&self) -> Option<Scene> {
        self.current_scene
    }

    /// Measure a processed buffer and fold it into the histories
    pub fn track_audio_quality(&mut self, samples: &[f32], format: AudioFormat) -> QualityMeasurement {
        let measurement = QualityScorer::measure(samples);

        self.volume_history.push(measurement.rms);
        self.quality_history.push(measurement.score);
        self.peak_volume = self.peak_volume.max(measurement.peak);

        let channels = format.channel_count().max(1);
        let frames = samples.len() / channels;
        self.total_listening_secs += frames as f64 / f64::from(format.sample_rate.as_hz().max(1));
        self.last_measurement = Some(measurement);

        measurement
    }

    /// Most recent buffer measurement
    pub fn last_measurement(&self) -> Option<QualityMeasurement> {
        self.last_measurement
    }

    /// Mean RMS over the volume history
    pub fn average_volume(&self) -> f32 {
        self.volume_history.mean()
    }

    /// Mean score over the quality history
    pub fn average_quality(&self) -> f32 {
        self.quality_history.mean()
    }

    /// Volume history (oldest first)
    pub fn volume_history(&self) -> &RollingHistory {
        &self.volume_history
    }

    /// Quality history (oldest first)
    pub fn quality_history(&self) -> &RollingHistory {
        &self.quality_history
    }

    /// Build an exportable snapshot
    pub fn statistics(&self) -> AudioUsageStatistics {
        let scene_play_counts = Scene::ALL
            .iter()
            .zip(self.scene_plays.iter())
            .filter(|(_, plays)| **plays > 0)
            .map(|(scene, &plays)| (scene.id().to_string(), plays))
            .collect();

        AudioUsageStatistics {
            total_listening_time_secs: self.total_listening_secs,
            session_count: self.session_count,
            average_volume: self.average_volume(),
            peak_volume: self.peak_volume,
            quality_score: self.average_quality(),
            scene_play_counts,
            generated_at: Utc::now(),
        }
    }

    /// Clear all readings and counters
    pub fn reset(&mut self) {
        debug!("Resetting audio analytics");
        self.volume_history.clear();
        self.quality_history.clear();
        self.peak_volume = 0.0;
        self.total_listening_secs = 0.0;
        self.session_count = 0;
        self.session_active = false;
        self.scene_plays = [0; Scene::COUNT];
        self.current_scene = None;
        self.last_measurement = None;
    }
}

impl Default for AudioAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsSink for AudioAnalytics {
    fn on_buffer(&mut self, samples: &[f32], format: AudioFormat) {
        self.track_audio_quality(samples, format);
    }

    fn on_scene(&mut self, scene: Scene) {
        self.track_scene_play(scene);
    }
}
