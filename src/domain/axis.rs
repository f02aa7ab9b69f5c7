// Value-axis range derivation per metric
use super::metric::Metric;
use serde::Serialize;

/// Range used when the selected metric has no present value
pub const FALLBACK_AXIS: AxisSpec = AxisSpec {
    min: 0.0,
    max: 100.0,
    step: 5.0,
};

const TEMPERATURE_HALF_WINDOW: f64 = 10.0;
const HUMIDITY_PADDING: f64 = 10.0;
const PRESSURE_PADDING: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Derive {min, max, step} for `metric` from its present values.
///
/// Non-finite values are ignored. Temperature always gets a 20-unit window
/// around the rounded midpoint, so a wider spread can leave the axis.
pub fn derive_axis<I>(values: I, metric: Metric) -> AxisSpec
where
    I: IntoIterator<Item = f64>,
{
    let bounds = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        });

    let Some((lo, hi)) = bounds else {
        return FALLBACK_AXIS;
    };

    match metric {
        Metric::Temperature => {
            let center = round_half_up((lo + hi) / 2.0);
            AxisSpec::new(
                snap_down(center - TEMPERATURE_HALF_WINDOW, 2.0),
                snap_up(center + TEMPERATURE_HALF_WINDOW, 2.0),
                2.0,
            )
        }
        Metric::Humidity => {
            let padded_min = snap_down(lo - HUMIDITY_PADDING, 5.0);
            let padded_max = snap_up(hi + HUMIDITY_PADDING, 5.0);
            let (min, max) = (padded_min.max(0.0), padded_max.min(100.0));
            // Readings entirely outside [0, 100] keep the padded range unclamped
            if min <= max {
                AxisSpec::new(min, max, 5.0)
            } else {
                AxisSpec::new(padded_min, padded_max, 5.0)
            }
        }
        Metric::Pressure => AxisSpec::new(
            snap_down(lo - PRESSURE_PADDING, 10.0),
            snap_up(hi + PRESSURE_PADDING, 10.0),
            20.0,
        ),
    }
}

// Halves go towards +inf, matching the browser's Math.round.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn snap_down(value: f64, multiple: f64) -> f64 {
    (value / multiple).floor() * multiple + 0.0
}

fn snap_up(value: f64, multiple: f64) -> f64 {
    (value / multiple).ceil() * multiple + 0.0
}
