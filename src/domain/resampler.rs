// Time series resampling: dedupe, minute grid, gap fill, axis range
use super::axis::derive_axis;
use super::chart::ChartData;
use super::metric::Metric;
use super::sample::{CleanedSample, MinuteKey, Sample};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::{BTreeMap, HashMap};

/// Turns raw samples into a uniform per-minute series for one metric.
///
/// Holds no state besides the display offset; every call recomputes from
/// the given samples.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesResampler {
    offset: FixedOffset,
}

impl Default for TimeSeriesResampler {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl TimeSeriesResampler {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn resample(&self, samples: &[Sample], metric: Metric) -> ChartData {
        let cleaned = dedupe_by_minute(samples, &self.offset);
        let grid = build_grid(&cleaned);
        let filled = fill_grid(&grid, &cleaned);

        let series: Vec<Option<f64>> = filled.iter().map(|entry| entry.value(metric)).collect();
        let axis = derive_axis(series.iter().flatten().copied(), metric);
        let labels = thin_labels(&grid);

        tracing::debug!(
            metric = %metric,
            samples = samples.len(),
            distinct_minutes = cleaned.len(),
            grid_len = grid.len(),
            "Resampled series"
        );

        ChartData::new(metric, grid, labels, series, axis)
    }

    /// Most recent sample with a parseable timestamp; later input wins ties
    pub fn latest<'a>(&self, samples: &'a [Sample]) -> Option<(DateTime<FixedOffset>, &'a Sample)> {
        samples
            .iter()
            .filter_map(|s| s.instant(&self.offset).map(|t| (t, s)))
            .fold(None, |latest, (t, s)| match latest {
                Some((best, _)) if best > t => latest,
                _ => Some((t, s)),
            })
    }

    /// Samples whose timestamp falls on `day` in the display offset
    pub fn samples_for_day(&self, samples: &[Sample], day: NaiveDate) -> Vec<Sample> {
        samples
            .iter()
            .filter(|s| {
                s.instant(&self.offset)
                    .is_some_and(|t| t.date_naive() == day)
            })
            .cloned()
            .collect()
    }
}

/// Collapse samples to one entry per minute of day, ascending.
///
/// Samples without a valid timestamp are dropped. Samples are ordered by full
/// timestamp first (stable, so equal instants keep input order) and the later
/// one wins a shared minute.
pub fn dedupe_by_minute(samples: &[Sample], offset: &FixedOffset) -> Vec<CleanedSample> {
    let mut timed: Vec<(DateTime<FixedOffset>, &Sample)> = samples
        .iter()
        .filter_map(|s| s.instant(offset).map(|t| (t, s)))
        .collect();
    timed.sort_by_key(|(t, _)| *t);

    let mut by_minute: BTreeMap<MinuteKey, CleanedSample> = BTreeMap::new();
    for (instant, sample) in timed {
        let key = MinuteKey::from_instant(&instant);
        by_minute.insert(key, CleanedSample::from_sample(key, sample));
    }

    by_minute.into_values().collect()
}

/// Every minute from the first to the last key, both rounded up to :00/:30
pub fn build_grid(cleaned: &[CleanedSample]) -> Vec<MinuteKey> {
    let (Some(first), Some(last)) = (cleaned.first(), cleaned.last()) else {
        return Vec::new();
    };

    let start = first.key.round_up_to_half_hour().minute_of_day();
    let end = last.key.round_up_to_half_hour().minute_of_day();

    (start..=end).filter_map(MinuteKey::new).collect()
}

/// One entry per grid slot; slots without an observation become gaps
pub fn fill_grid(grid: &[MinuteKey], cleaned: &[CleanedSample]) -> Vec<CleanedSample> {
    let by_key: HashMap<MinuteKey, &CleanedSample> =
        cleaned.iter().map(|entry| (entry.key, entry)).collect();

    grid.iter()
        .map(|key| match by_key.get(key) {
            Some(entry) => (*entry).clone(),
            None => CleanedSample::gap(*key),
        })
        .collect()
}

/// "HH:MM" on :00 and :30 slots, empty elsewhere
pub fn thin_labels(grid: &[MinuteKey]) -> Vec<String> {
    grid.iter()
        .map(|key| {
            if key.is_half_hour_mark() {
                key.to_string()
            } else {
                String::new()
            }
        })
        .collect()
}
