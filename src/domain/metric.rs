// Weather metric selection
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Metric {
    #[default]
    Temperature,
    Humidity,
    Pressure,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric '{0}', expected temperature, humidity or pressure")]
pub struct UnknownMetric(pub String);

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::Pressure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Pressure => "pressure",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Pressure => "Air Pressure",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Pressure => "hPa",
        }
    }

    /// Fraction digits used when the latest reading is shown as a tile
    pub fn precision(&self) -> i32 {
        match self {
            Metric::Humidity => 0,
            Metric::Temperature | Metric::Pressure => 1,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temperature" | "temp" => Ok(Metric::Temperature),
            "humidity" | "hum" => Ok(Metric::Humidity),
            "pressure" | "press" => Ok(Metric::Pressure),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

impl TryFrom<String> for Metric {
    type Error = UnknownMetric;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
