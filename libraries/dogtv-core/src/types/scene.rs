/// Scene catalogue
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Emotional target a scene's soundscape is tuned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneMood {
    /// Relaxation: more reverb, gentle dynamics
    Calming,
    /// Default processing
    Neutral,
    /// Engagement: drier, punchier sound
    Stimulating,
}

/// Looping audio-visual scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Ocean,
    Forest,
    Rain,
    Meadow,
    Fireplace,
    Birdsong,
    Playtime,
}

impl Scene {
    /// Number of scenes in the catalogue
    pub const COUNT: usize = 7;

    /// All scenes in catalogue order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Ocean,
        Self::Forest,
        Self::Rain,
        Self::Meadow,
        Self::Fireplace,
        Self::Birdsong,
        Self::Playtime,
    ];

    /// Identifier used in configuration and statistics
    pub fn id(self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Rain => "rain",
            Self::Meadow => "meadow",
            Self::Fireplace => "fireplace",
            Self::Birdsong => "birdsong",
            Self::Playtime => "playtime",
        }
    }

    /// Mood the scene's processing is tuned for
    pub fn mood(self) -> SceneMood {
        match self {
            Self::Ocean | Self::Rain | Self::Fireplace => SceneMood::Calming,
            Self::Forest | Self::Meadow => SceneMood::Neutral,
            Self::Birdsong | Self::Playtime => SceneMood::Stimulating,
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scene {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scene| scene.id() == wanted)
            .ok_or_else(|| ConfigError::UnknownScene(s.to_string()))
    }
}
