// Weather sample domain models
use super::metric::Metric;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u16 = 24 * 60;
const HALF_HOUR: u16 = 30;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Raw reading as delivered by the ingestion side
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sample {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
}

impl Sample {
    pub fn new(
        id: i64,
        timestamp: Option<String>,
        temp: Option<f64>,
        humidity: Option<f64>,
        pressure: Option<f64>,
    ) -> Self {
        Self {
            id,
            timestamp,
            temp,
            humidity,
            pressure,
        }
    }

    /// Parsed timestamp in the display offset, `None` when absent or malformed
    pub fn instant(&self, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.timestamp.as_deref()?, offset)
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        let value = match metric {
            Metric::Temperature => self.temp,
            Metric::Humidity => self.humidity,
            Metric::Pressure => self.pressure,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Parse an RFC 3339 timestamp, or a naive one taken to be in `offset`
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(offset));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

/// Minute of the day, rendered as "HH:MM"
///
/// Holds `0..=1440`. The value 1440 ("24:00") only appears as the end of a
/// grid whose last sample was rounded up past 23:30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteKey(u16);

impl MinuteKey {
    pub fn new(minute_of_day: u16) -> Option<Self> {
        (minute_of_day <= MINUTES_PER_DAY).then_some(Self(minute_of_day))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::new(hour.checked_mul(60)?.checked_add(minute)?)
    }

    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self((instant.hour() * 60 + instant.minute()) as u16)
    }

    pub fn minute_of_day(self) -> u16 {
        self.0
    }

    pub fn is_half_hour_mark(self) -> bool {
        self.0 % HALF_HOUR == 0
    }

    /// Snap forward to the next :00 or :30, keeping keys already on one
    pub fn round_up_to_half_hour(self) -> Self {
        Self(self.0.div_ceil(HALF_HOUR) * HALF_HOUR)
    }
}

impl fmt::Display for MinuteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for MinuteKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid minute key: {s}"))?;
        let hour: u16 = hour.parse().map_err(|_| format!("invalid hour in {s}"))?;
        let minute: u16 = minute
            .parse()
            .map_err(|_| format!("invalid minute in {s}"))?;
        Self::from_hm(hour, minute).ok_or_else(|| format!("minute key out of range: {s}"))
    }
}

impl Serialize for MinuteKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One entry per distinct minute; also used for gap slots with every value absent
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSample {
    pub key: MinuteKey,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

impl CleanedSample {
    pub fn from_sample(key: MinuteKey, sample: &Sample) -> Self {
        Self {
            key,
            temp: sample.value(Metric::Temperature),
            humidity: sample.value(Metric::Humidity),
            pressure: sample.value(Metric::Pressure),
        }
    }

    pub fn gap(key: MinuteKey) -> Self {
        Self {
            key,
            temp: None,
            humidity: None,
            pressure: None,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temp,
            Metric::Humidity => self.humidity,
            Metric::Pressure => self.pressure,
        }
    }
}
