//! Virtual sensors: readings combined from linked sources.

use thermal_core::errors::SensorError;
use thermal_core::traits::RawIo;
use thermal_core::types::{Formula, VirtualSensorInfo};

/// Parse raw sensor text (surrounding whitespace ignored).
pub fn parse_reading(name: &str, raw: &str) -> Result<f64, SensorError> {
    raw.trim().parse::<f64>().map_err(|_| SensorError::Unparsable {
        name: name.to_string(),
        raw: raw.to_string(),
    })
}

/// Fold `(reading, coefficient)` samples with `formula`.
///
/// `None` when there are no samples.
pub fn combine(formula: Formula, samples: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let mut acc: Option<f64> = None;
    for (reading, coefficient) in samples {
        let current = acc.unwrap_or(0.0);
        acc = Some(match formula {
            Formula::CountThreshold => {
                let hit = if coefficient < 0.0 {
                    reading < -coefficient
                } else {
                    reading >= coefficient
                };
                current + if hit { 1.0 } else { 0.0 }
            }
            Formula::WeightedAvg => current + reading * coefficient,
            Formula::Maximum => match acc {
                Some(v) => v.max(reading * coefficient),
                None => reading * coefficient,
            },
            Formula::Minimum => match acc {
                Some(v) => v.min(reading * coefficient),
                None => reading * coefficient,
            },
        });
    }
    acc
}

/// Read every linked source and combine them. Unreadable sources and
/// sources without a coefficient are skipped. The result is unscaled.
pub fn evaluate(name: &str, info: &VirtualSensorInfo, io: &dyn RawIo) -> Result<f64, SensorError> {
    let samples = info.linked_sensors.iter().filter_map(|linked| {
        let coefficient = linked.coefficient.filter(|c| !c.is_nan())?;
        let raw = match io.read_value(&linked.name) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(sensor = name, linked = %linked.name, error = %e, "linked source unreadable");
                return None;
            }
        };
        match parse_reading(&linked.name, &raw) {
            Ok(reading) => Some((reading, coefficient)),
            Err(e) => {
                tracing::debug!(sensor = name, error = %e, "linked source unparsable");
                None
            }
        }
    });
    combine(info.formula, samples).ok_or_else(|| SensorError::NoReadableSources {
        name: name.to_string(),
    })
}
