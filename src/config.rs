use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// The destination API rejects metric updates more frequent than one per
/// second, so smaller configured delays are clamped up instead of rejected.
pub const MIN_UPDATE_DELAY_MS: u64 = 1000;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Static configuration, loaded once at startup and never reloaded.
///
/// All top-level keys except `requestTimeout` are required; a missing key is
/// a fatal startup error, not something discovered mid-loop.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "sourceAPIHost")]
    pub source_api_host: String,
    #[serde(rename = "sourceAPIToken")]
    pub source_api_token: String,
    #[serde(rename = "destinationAPIHost")]
    pub destination_api_host: String,
    #[serde(rename = "destinationAPIKey")]
    pub destination_api_key: String,
    /// Milliseconds between full polling cycles.
    #[serde(rename = "updateDelay")]
    pub update_delay_ms: u64,
    /// Per-request HTTP timeout in milliseconds.
    #[serde(rename = "requestTimeout", default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    pub metrics: Vec<MetricDefinition>,
}

/// One metric to relay. Duplicates are allowed and processed independently,
/// in the order they appear.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricDefinition {
    pub description: String,
    #[serde(rename = "sourceDashboardID")]
    pub source_dashboard_id: String,
    #[serde(rename = "sourceWidgetID")]
    pub source_widget_id: String,
    #[serde(rename = "destinationPageID")]
    pub destination_page_id: String,
    #[serde(rename = "destinationMetricID")]
    pub destination_metric_id: String,
}

impl Config {
    /// Read and validate a configuration file, clamping the update delay to
    /// the destination API's minimum. The clamp warning fires at most once,
    /// here, at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if config.update_delay_ms < MIN_UPDATE_DELAY_MS {
            warn!(
                "[config] update delay {}ms is below the destination API's minimum \
                 update frequency of 1 second, using {}ms",
                config.update_delay_ms, MIN_UPDATE_DELAY_MS
            );
            config.update_delay_ms = MIN_UPDATE_DELAY_MS;
        }

        Ok(config)
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
