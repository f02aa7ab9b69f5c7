// Dashboard domain model
use super::chart::ChartData;
use super::metric::Metric;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
}

impl TileData {
    pub fn for_metric(metric: Metric, value: f64) -> Self {
        Self {
            id: metric.as_str().to_string(),
            title: metric.title().to_string(),
            unit: metric.unit().to_string(),
            value,
            precision: metric.precision(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub day: Option<NaiveDate>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub tiles: Vec<TileData>,
    pub chart: ChartData,
}

impl Dashboard {
    pub fn new(
        title: String,
        day: Option<NaiveDate>,
        updated_at: Option<DateTime<FixedOffset>>,
        tiles: Vec<TileData>,
        chart: ChartData,
    ) -> Self {
        Self {
            title,
            day,
            updated_at,
            tiles,
            chart,
        }
    }
}
