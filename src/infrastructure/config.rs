use crate::domain::metric::Metric;
use anyhow::Context;
use chrono::FixedOffset;
use serde::Deserialize;

const CONFIG_FILE: &str = "config/weather";
const ENV_PREFIX: &str = "WEATHER";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub title: String,
    /// Offset in which minute keys and calendar days are computed
    pub utc_offset_minutes: i32,
    pub default_metric: Metric,
}

impl DashboardSettings {
    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).with_context(|| {
            format!(
                "dashboard.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )
        })
    }
}

pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from(CONFIG_FILE)
}

/// Defaults, then the optional file at `path`, then `WEATHER__SECTION__KEY` variables
pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("dashboard.title", "Weather")?
        .set_default("dashboard.utc_offset_minutes", 0)?
        .set_default("dashboard.default_metric", "temperature")?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to build configuration")?;

    settings
        .try_deserialize()
        .context("failed to deserialize configuration")
}
