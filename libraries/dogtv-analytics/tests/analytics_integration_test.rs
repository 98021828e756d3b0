//! Integration tests for quality scoring and statistics export

use dogtv_analytics::{
    AnalyticsSink, AudioAnalytics, AudioUsageStatistics, QualityScorer, RollingHistory,
    QUALITY_HISTORY_CAPACITY, VOLUME_HISTORY_CAPACITY,
};
use dogtv_core::{AudioFormat, Scene};
use proptest::prelude::*;

#[test]
fn full_session_exports_json() {
    let mut analytics = AudioAnalytics::new();
    analytics.start_session();
    analytics.on_scene(Scene::Rain);
    analytics.on_scene(Scene::Rain);
    analytics.on_scene(Scene::Birdsong);

    let buffer: Vec<f32> = (0..9_600).map(|i| if i % 2 == 0 { 0.4 } else { -0.4 }).collect();
    for _ in 0..5 {
        analytics.on_buffer(&buffer, AudioFormat::stereo_48k());
    }
    analytics.end_session();

    let stats = analytics.statistics();
    assert_eq!(stats.session_count, 1);
    assert!((stats.total_listening_time_secs - 0.5).abs() < 1e-9);
    assert!((stats.average_volume - 0.4).abs() < 1e-6);
    assert!((stats.peak_volume - 0.4).abs() < 1e-6);
    assert_eq!(stats.scene_play_counts.get("rain"), Some(&2));
    assert_eq!(stats.scene_play_counts.get("birdsong"), Some(&1));
    assert!(!stats.scene_play_counts.contains_key("ocean"));

    let json = stats.to_json().unwrap();
    let parsed: AudioUsageStatistics = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, stats);
    assert!(json.contains("\"total_listening_time_secs\""));
    assert!(json.contains("\"generated_at\""));
}

#[test]
fn default_histories_have_documented_capacity() {
    let mut analytics = AudioAnalytics::new();
    for _ in 0..(VOLUME_HISTORY_CAPACITY + 50) {
        analytics.on_buffer(&[0.1; 8], AudioFormat::stereo_48k());
    }
    assert_eq!(analytics.volume_history().len(), VOLUME_HISTORY_CAPACITY);
    assert_eq!(analytics.quality_history().len(), QUALITY_HISTORY_CAPACITY);
}

#[test]
fn reset_clears_everything() {
    let mut analytics = AudioAnalytics::new();
    analytics.start_session();
    analytics.on_scene(Scene::Meadow);
    analytics.on_buffer(&[0.5; 64], AudioFormat::stereo_48k());

    analytics.reset();
    let stats = analytics.statistics();
    assert_eq!(stats.session_count, 0);
    assert_eq!(stats.total_listening_time_secs, 0.0);
    assert!(stats.scene_play_counts.is_empty());
    assert!(analytics.current_scene().is_none());
}

proptest! {
    /// Property: scores stay within 0 - 100 for any finite buffer
    #[test]
    fn score_is_bounded(samples in prop::collection::vec(-1.0f32..=1.0, 0..2000)) {
        let m = QualityScorer::measure(&samples);
        prop_assert!(m.score >= 0.0 && m.score <= 100.0, "score {}", m.score);
        prop_assert!(m.rms <= m.peak + 1e-6);
    }

    /// Property: rolling history never exceeds capacity and keeps the newest value
    #[test]
    fn history_is_bounded(capacity in 1usize..64, values in prop::collection::vec(-10.0f32..10.0, 1..300)) {
        let mut history = RollingHistory::new(capacity);
        for &v in &values {
            history.push(v);
        }
        prop_assert_eq!(history.len(), values.len().min(capacity));
        prop_assert_eq!(history.latest(), values.last().copied());
    }
}
