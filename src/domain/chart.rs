// Chart-ready series handed to the drawing side
use super::axis::AxisSpec;
use super::metric::Metric;
use super::sample::MinuteKey;
use serde::Serialize;

/// One value per grid slot; `None` serializes as `null` and marks a gap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub metric: Metric,
    pub title: String,
    pub unit: String,
    pub keys: Vec<MinuteKey>,
    pub labels: Vec<String>,
    pub series: Vec<Option<f64>>,
    pub y_min: f64,
    pub y_max: f64,
    pub step: f64,
}

impl ChartData {
    pub fn new(
        metric: Metric,
        keys: Vec<MinuteKey>,
        labels: Vec<String>,
        series: Vec<Option<f64>>,
        axis: AxisSpec,
    ) -> Self {
        Self {
            metric,
            title: metric.title().to_string(),
            unit: metric.unit().to_string(),
            keys,
            labels,
            series,
            y_min: axis.min,
            y_max: axis.max,
            step: axis.step,
        }
    }

    pub fn axis(&self) -> AxisSpec {
        AxisSpec::new(self.y_min, self.y_max, self.step)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
