//! Per-scene tuning of the dynamics and spatial stages

use crate::effects::{CompressorSettings, NoiseGateSettings, ReverbSettings};
use dogtv_core::{Scene, SceneMood};

/// Parameters of the stages the user does not tune directly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageParameters {
    pub compressor: CompressorSettings,
    pub noise_gate: NoiseGateSettings,
    pub reverb: ReverbSettings,
}

impl StageParameters {
    /// Preset for a mood
    ///
    /// Calming scenes get a wetter room and gentler, slower compression.
    /// Stimulating scenes stay dry with fast, light compression.
    pub const fn for_mood(mood: SceneMood) -> Self {
        match mood {
            SceneMood::Neutral => Self {
                compressor: CompressorSettings {
                    threshold_db: -20.0,
                    headroom_db: 5.0,
                    attack_ms: 10.0,
                    release_ms: 150.0,
                    makeup_gain_db: 2.0,
                },
                noise_gate: NoiseGateSettings::with_threshold(-65.0),
                reverb: ReverbSettings {
                    wet_dry_mix: 25.0,
                    room_size: 0.6,
                    damping: 0.4,
                },
            },
            SceneMood::Calming => Self {
                compressor: CompressorSettings {
                    threshold_db: -26.0,
                    headroom_db: 6.5,
                    attack_ms: 5.0,
                    release_ms: 300.0,
                    makeup_gain_db: 4.0,
                },
                noise_gate: NoiseGateSettings::with_threshold(-60.0),
                reverb: ReverbSettings {
                    wet_dry_mix: 40.0,
                    room_size: 0.8,
                    damping: 0.5,
                },
            },
            SceneMood::Stimulating => Self {
                compressor: CompressorSettings {
                    threshold_db: -16.0,
                    headroom_db: 8.0,
                    attack_ms: 15.0,
                    release_ms: 100.0,
                    makeup_gain_db: 1.0,
                },
                noise_gate: NoiseGateSettings::with_threshold(-55.0),
                reverb: ReverbSettings {
                    wet_dry_mix: 10.0,
                    room_size: 0.4,
                    damping: 0.3,
                },
            },
        }
    }

    /// Preset for a scene's mood
    pub fn for_scene(scene: Scene) -> Self {
        Self::for_mood(scene.mood())
    }
}

impl Default for StageParameters {
    fn default() -> Self {
        Self::for_mood(SceneMood::Neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverb_mix_follows_mood() {
        assert_eq!(StageParameters::for_mood(SceneMood::Calming).reverb.wet_dry_mix, 40.0);
        assert_eq!(StageParameters::for_mood(SceneMood::Neutral).reverb.wet_dry_mix, 25.0);
        assert_eq!(StageParameters::for_mood(SceneMood::Stimulating).reverb.wet_dry_mix, 10.0);
    }

    #[test]
    fn presets_are_already_valid() {
        for mood in [SceneMood::Calming, SceneMood::Neutral, SceneMood::Stimulating] {
            let params = StageParameters::for_mood(mood);
            let mut compressor = params.compressor;
            compressor.validate();
            assert_eq!(compressor, params.compressor);
            let mut gate = params.noise_gate;
            gate.validate();
            assert_eq!(gate, params.noise_gate);
            let mut reverb = params.reverb;
            reverb.validate();
            assert_eq!(reverb, params.reverb);
        }
    }

    #[test]
    fn scene_uses_its_mood() {
        assert_eq!(
            StageParameters::for_scene(Scene::Ocean),
            StageParameters::for_mood(SceneMood::Calming)
        );
        assert_eq!(StageParameters::default(), StageParameters::for_scene(Scene::Forest));
    }
}
