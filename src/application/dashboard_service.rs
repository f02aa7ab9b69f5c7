// Dashboard service - Use case for building a weather dashboard from a sample batch
use crate::domain::chart::ChartData;
use crate::domain::dashboard::{Dashboard, TileData};
use crate::domain::metric::Metric;
use crate::domain::resampler::TimeSeriesResampler;
use crate::domain::sample::Sample;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct DashboardService {
    resampler: TimeSeriesResampler,
    title: String,
}

impl DashboardService {
    pub fn new(resampler: TimeSeriesResampler, title: String) -> Self {
        Self { resampler, title }
    }

    pub fn resampler(&self) -> &TimeSeriesResampler {
        &self.resampler
    }

    /// Keep only the samples of `day`, defaulting to the day of the newest sample
    pub fn select_day(
        &self,
        samples: &[Sample],
        day: Option<NaiveDate>,
    ) -> (Option<NaiveDate>, Vec<Sample>) {
        let day = day.or_else(|| {
            self.resampler
                .latest(samples)
                .map(|(instant, _)| instant.date_naive())
        });

        match day {
            Some(day) => {
                let selected = self.resampler.samples_for_day(samples, day);
                tracing::debug!(
                    %day,
                    total = samples.len(),
                    selected = selected.len(),
                    "Selected samples for day"
                );
                (Some(day), selected)
            }
            None => (None, Vec::new()),
        }
    }

    pub fn get_chart(&self, samples: &[Sample], metric: Metric, day: Option<NaiveDate>) -> ChartData {
        let (_, selected) = self.select_day(samples, day);
        self.resampler.resample(&selected, metric)
    }

    pub fn get_dashboard(
        &self,
        samples: &[Sample],
        metric: Metric,
        day: Option<NaiveDate>,
    ) -> Dashboard {
        let (day, selected) = self.select_day(samples, day);
        let latest = self.resampler.latest(&selected);

        let tiles = self.build_tiles(latest.map(|(_, sample)| sample));
        let chart = self.resampler.resample(&selected, metric);

        Dashboard::new(
            self.title_for(day),
            day,
            latest.map(|(instant, _)| instant),
            tiles,
            chart,
        )
    }

    pub fn title_for(&self, day: Option<NaiveDate>) -> String {
        match day {
            Some(day) => format!("{} ({})", self.title, day.format("%Y-%m-%d")),
            None => self.title.clone(),
        }
    }

    /// One tile per metric the latest reading actually carries
    pub fn build_tiles(&self, latest: Option<&Sample>) -> Vec<TileData> {
        let Some(sample) = latest else {
            return Vec::new();
        };

        Metric::ALL
            .iter()
            .filter_map(|metric| {
                sample
                    .value(*metric)
                    .map(|value| TileData::for_metric(*metric, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::axis::FALLBACK_AXIS;

    fn service() -> DashboardService {
        DashboardService::new(TimeSeriesResampler::default(), "Weather".to_string())
    }

    fn sample(id: i64, ts: &str, temp: f64, humidity: Option<f64>) -> Sample {
        Sample::new(id, Some(ts.to_string()), Some(temp), humidity, Some(1011.0))
    }

    fn batch() -> Vec<Sample> {
        vec![
            sample(1, "2024-04-30T18:00:00Z", 15.0, Some(60.0)),
            sample(2, "2024-05-01T09:10:00Z", 17.0, Some(55.0)),
            sample(3, "2024-05-01T09:40:00Z", 18.5, None),
        ]
    }

    #[test]
    fn test_select_day_defaults_to_latest_day() {
        let (day, selected) = service().select_day(&batch(), None);

        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_get_dashboard() {
        let dashboard = service().get_dashboard(&batch(), Metric::Temperature, None);

        assert_eq!(dashboard.title, "Weather (2024-05-01)");
        assert_eq!(
            dashboard.updated_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T09:40:00+00:00".to_string())
        );

        let tile_ids: Vec<&str> = dashboard.tiles.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(tile_ids, vec!["temperature", "pressure"]);
        assert_eq!(dashboard.tiles[0].value, 18.5);
        assert_eq!(dashboard.tiles[0].unit, "°C");

        // 09:10 and 09:40 round to 09:30 and 10:00
        assert_eq!(dashboard.chart.keys.len(), 31);
        assert_eq!(dashboard.chart.series[10], Some(18.5));
    }

    #[test]
    fn test_explicit_day_without_samples() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1);

        let dashboard = service().get_dashboard(&batch(), Metric::Humidity, day);

        assert!(dashboard.tiles.is_empty());
        assert_eq!(dashboard.updated_at, None);
        assert!(dashboard.chart.is_empty());
        assert_eq!(dashboard.chart.axis(), FALLBACK_AXIS);
    }

    #[test]
    fn test_no_valid_timestamps() {
        let samples = vec![Sample::new(1, Some("??".into()), Some(1.0), None, None)];

        let dashboard = service().get_dashboard(&samples, Metric::Temperature, None);

        assert_eq!(dashboard.day, None);
        assert_eq!(dashboard.title, "Weather");
        assert!(dashboard.chart.is_empty());
    }
}
