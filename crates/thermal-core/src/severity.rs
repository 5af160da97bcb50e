//! Ordered throttling severity scale shared by hot and cold classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::SEVERITY_COUNT;

/// Throttling severity, ordered from no throttling to imminent shutdown.
///
/// The discriminant doubles as the index into every per-severity array
/// (thresholds, hysteresis, PID gains, hard-limit columns).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    None = 0,
    Light = 1,
    Moderate = 2,
    Severe = 3,
    Critical = 4,
    Emergency = 5,
    Shutdown = 6,
}

impl Severity {
    /// All levels in ascending order.
    pub const ALL: [Severity; SEVERITY_COUNT] = [
        Severity::None,
        Severity::Light,
        Severity::Moderate,
        Severity::Severe,
        Severity::Critical,
        Severity::Emergency,
        Severity::Shutdown,
    ];

    /// Index into per-severity arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Level for an array index, `None` when out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_none(self) -> bool {
        self == Severity::None
    }

    /// Upper-case name used in power-hint mode strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Light => "LIGHT",
            Severity::Moderate => "MODERATE",
            Severity::Severe => "SEVERE",
            Severity::Critical => "CRITICAL",
            Severity::Emergency => "EMERGENCY",
            Severity::Shutdown => "SHUTDOWN",
        }
    }

    /// Levels above NONE, highest first.
    pub fn descending_above_none() -> impl Iterator<Item = Severity> {
        Self::ALL[1..].iter().rev().copied()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
