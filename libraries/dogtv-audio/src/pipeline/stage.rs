//! Stage identities and processing order

use crate::error::{AudioError, Result};
use std::fmt;

/// One of the five processing stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Equalizer,
    CanineFilter,
    Compressor,
    NoiseGate,
    Reverb,
}

impl StageKind {
    /// Number of stages
    pub const COUNT: usize = 5;

    /// All stages, in storage order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Equalizer,
        Self::CanineFilter,
        Self::Compressor,
        Self::NoiseGate,
        Self::Reverb,
    ];

    /// Storage slot of the stage
    pub fn index(self) -> usize {
        match self {
            Self::Equalizer => 0,
            Self::CanineFilter => 1,
            Self::Compressor => 2,
            Self::NoiseGate => 3,
            Self::Reverb => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Equalizer => "equalizer",
            Self::CanineFilter => "canine_filter",
            Self::Compressor => "compressor",
            Self::NoiseGate => "noise_gate",
            Self::Reverb => "reverb",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Order in which stages run
///
/// Always a permutation of [`StageKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOrder([StageKind; StageKind::COUNT]);

impl StageOrder {
    /// Order a freshly built pipeline starts with
    pub const DEFAULT: Self = Self([
        StageKind::CanineFilter,
        StageKind::Equalizer,
        StageKind::Reverb,
        StageKind::NoiseGate,
        StageKind::Compressor,
    ]);

    /// Tone shaping first, dynamics on the dry signal, reverb last so its
    /// tail is neither gated nor pumped by the compressor
    pub const OPTIMIZED: Self = Self([
        StageKind::Equalizer,
        StageKind::CanineFilter,
        StageKind::Compressor,
        StageKind::NoiseGate,
        StageKind::Reverb,
    ]);

    /// Validate a custom order
    pub fn new(stages: [StageKind; StageKind::COUNT]) -> Result<Self> {
        let mut seen = [false; StageKind::COUNT];
        for stage in stages {
            if std::mem::replace(&mut seen[stage.index()], true) {
                return Err(AudioError::InvalidStageOrder(format!(
                    "{} appears more than once",
                    stage
                )));
            }
        }
        Ok(Self(stages))
    }

    pub fn stages(&self) -> [StageKind; StageKind::COUNT] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = StageKind> + '_ {
        self.0.iter().copied()
    }

    /// Position of a stage in this order
    pub fn position(&self, stage: StageKind) -> usize {
        self.0.iter().position(|&s| s == stage).unwrap_or(stage.index())
    }

    pub fn is_optimized(&self) -> bool {
        *self == Self::OPTIMIZED
    }
}

impl Default for StageOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for StageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}
