//! Threshold classification with hysteresis.
//!
//! A reading is classified twice: against the hot thresholds (rising) and
//! the cold thresholds (falling). When a direction's fresh severity would
//! drop below the previous one, the hysteresis-relaxed severity is used
//! instead, so a reading must clear `threshold - hysteresis` (hot) or
//! `threshold + hysteresis` (cold) before the level is released.

use thermal_core::{Severity, SensorInfo, ThrottlingArray};

/// Threshold arrays of one sensor.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdView<'a> {
    pub hot: &'a ThrottlingArray,
    pub hot_hysteresis: &'a ThrottlingArray,
    pub cold: &'a ThrottlingArray,
    pub cold_hysteresis: &'a ThrottlingArray,
}

impl<'a> From<&'a SensorInfo> for ThresholdView<'a> {
    fn from(info: &'a SensorInfo) -> Self {
        Self {
            hot: &info.hot_thresholds,
            hot_hysteresis: &info.hot_hysteresis,
            cold: &info.cold_thresholds,
            cold_hysteresis: &info.cold_hysteresis,
        }
    }
}

/// Hot and cold severities of one classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityPair {
    pub hot: Severity,
    pub cold: Severity,
}

impl SeverityPair {
    pub fn new(hot: Severity, cold: Severity) -> Self {
        Self { hot, cold }
    }

    /// The reported status: the more severe of the two directions.
    pub fn status(self) -> Severity {
        self.hot.max(self.cold)
    }
}

/// Classify `value` given the previous hot/cold severities.
///
/// Levels are scanned from SHUTDOWN down to LIGHT; the first configured
/// threshold that matches wins. Unset (NaN) thresholds never match.
pub fn classify(view: &ThresholdView<'_>, previous: SeverityPair, value: f64) -> SeverityPair {
    let mut hot = None;
    let mut hot_relaxed = None;
    let mut cold = None;
    let mut cold_relaxed = None;

    for level in Severity::descending_above_none() {
        let i = level.index();
        let h = view.hot[i];
        if !h.is_nan() {
            if hot.is_none() && h <= value {
                hot = Some(level);
            }
            if hot_relaxed.is_none() && h - view.hot_hysteresis[i] < value {
                hot_relaxed = Some(level);
            }
        }
        let c = view.cold[i];
        if !c.is_nan() {
            if cold.is_none() && c >= value {
                cold = Some(level);
            }
            if cold_relaxed.is_none() && c + view.cold_hysteresis[i] > value {
                cold_relaxed = Some(level);
            }
        }
    }

    let mut hot = hot.unwrap_or_default();
    let mut cold = cold.unwrap_or_default();
    if hot < previous.hot {
        hot = hot_relaxed.unwrap_or_default();
    }
    if cold < previous.cold {
        cold = cold_relaxed.unwrap_or_default();
    }
    SeverityPair { hot, cold }
}
