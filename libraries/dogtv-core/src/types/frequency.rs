//! Canine hearing frequency policy
//!
//! Maps the user-facing [`FrequencyRange`] to the concrete Hertz interval the
//! canine band filter keeps. There is exactly one table, [`CANINE_HEARING_POLICY`];
//! every consumer resolves ranges through it.
//!
//! Intervals are half-open `[lower, upper)`. Adjacent ranges share a boundary
//! and together cover 0 Hz up to the documented upper limit of dog hearing.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Band of the spectrum a scene's audio is focused on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyRange {
    /// 0 - 10 kHz
    Low,
    /// 10 - 20 kHz
    Mid,
    /// 20 - 45 kHz
    #[default]
    High,
    /// 45 - 65 kHz, the upper edge of canine hearing
    #[serde(alias = "ultraHigh")]
    UltraHigh,
}

impl FrequencyRange {
    /// All ranges, lowest first
    pub const ALL: [Self; 4] = [Self::Low, Self::Mid, Self::High, Self::UltraHigh];

    /// Resolve through [`CANINE_HEARING_POLICY`]
    pub fn hertz_range(self) -> HertzRange {
        CANINE_HEARING_POLICY.hertz_range(self)
    }

    /// Name as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
            Self::UltraHigh => "ultra_high",
        }
    }
}

impl fmt::Display for FrequencyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered frequency interval in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HertzRange {
    lower: f64,
    upper: f64,
}

impl HertzRange {
    /// Create a validated range
    ///
    /// Requires finite bounds with `0 <= lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_finite() && upper.is_finite() && lower >= 0.0 && lower < upper {
            Ok(Self { lower, upper })
        } else {
            Err(ConfigError::InvalidRange { lower, upper })
        }
    }

    // Table entries are checked by `RangePolicy::validate` and its tests.
    const fn from_table(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Lower bound in Hz (high-pass corner)
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound in Hz (low-pass corner)
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Width of the interval in Hz
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `hz` falls in `[lower, upper)`
    pub fn contains(&self, hz: f64) -> bool {
        hz >= self.lower && hz < self.upper
    }

    /// Whether two half-open intervals share any frequency
    pub fn overlaps(&self, other: &Self) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }

    /// `(lower, upper)` pair
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl fmt::Display for HertzRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}-{:.0} Hz", self.lower, self.upper)
    }
}

/// Named mapping from every [`FrequencyRange`] to a [`HertzRange`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangePolicy {
    name: &'static str,
    entries: [(FrequencyRange, HertzRange); 4],
}

/// The canonical canine hearing table
///
/// Covers the documented canine upper hearing limit of roughly 45-65 kHz.
pub const CANINE_HEARING_POLICY: RangePolicy = RangePolicy {
    name: "canine-hearing",
    entries: [
        (FrequencyRange::Low, HertzRange::from_table(0.0, 10_000.0)),
        (FrequencyRange::Mid, HertzRange::from_table(10_000.0, 20_000.0)),
        (FrequencyRange::High, HertzRange::from_table(20_000.0, 45_000.0)),
        (FrequencyRange::UltraHigh, HertzRange::from_table(45_000.0, 65_000.0)),
    ],
};

impl RangePolicy {
    /// Policy name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Hertz interval for a range
    pub fn hertz_range(&self, range: FrequencyRange) -> HertzRange {
        self.entries
            .iter()
            .find(|(r, _)| *r == range)
            .map(|(_, hz)| *hz)
            // Every variant has an entry; `validate` checks it.
            .unwrap_or(self.entries[0].1)
    }

    /// Iterate over `(range, interval)` pairs, lowest first
    pub fn entries(&self) -> impl Iterator<Item = (FrequencyRange, HertzRange)> + '_ {
        self.entries.iter().copied()
    }

    /// Highest frequency the table covers
    pub fn max_hz(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, hz)| hz.upper)
            .fold(0.0, f64::max)
    }

    /// Check the table invariants
    ///
    /// - every variant appears exactly once
    /// - every interval is ordered and non-empty
    /// - intervals are pairwise disjoint
    /// - sorted by lower bound they tile `[0, max_hz)` without gaps
    pub fn validate(&self) -> Result<()> {
        for range in FrequencyRange::ALL {
            let count = self.entries.iter().filter(|(r, _)| *r == range).count();
            if count != 1 {
                return Err(ConfigError::invalid_format(format!(
                    "policy '{}' maps {} {} times",
                    self.name, range, count
                )));
            }
        }

        for (_, hz) in &self.entries {
            HertzRange::new(hz.lower, hz.upper)?;
        }

        for (i, (_, a)) in self.entries.iter().enumerate() {
            for (_, b) in &self.entries[i + 1..] {
                if a.overlaps(b) {
                    return Err(ConfigError::InvalidRange {
                        lower: b.lower,
                        upper: b.upper,
                    });
                }
            }
        }

        let mut sorted: Vec<HertzRange> = self.entries.iter().map(|(_, hz)| *hz).collect();
        sorted.sort_by(|a, b| a.lower.total_cmp(&b.lower));
        let mut edge = 0.0;
        for hz in sorted {
            if hz.lower != edge {
                return Err(ConfigError::InvalidRange {
                    lower: edge,
                    upper: hz.lower,
                });
            }
            edge = hz.upper;
        }

        Ok(())
    }
}
