use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::UpdateError;

#[derive(Debug, Serialize)]
pub struct MetricUpdate {
    pub data: MetricPoint,
}

#[derive(Debug, Serialize)]
pub struct MetricPoint {
    pub timestamp: u64,
    pub value: Value,
}

/// Write-only client for the destination status-page API.
///
/// Dry-run is a field here rather than process-global state so tests and
/// callers can inject it explicitly.
pub struct DestinationClient {
    client: Client,
    host: String,
    api_key: String,
    dry_run: bool,
}

impl DestinationClient {
    pub fn new(host: &str, api_key: &str, timeout: Duration, dry_run: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client for the destination API")?;
        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            dry_run,
        })
    }

    /// Send one value, stamped with the current unix time, to a page metric.
    /// In dry-run mode the request is built and logged but never sent.
    pub async fn push_value(
        &self,
        page_id: &str,
        metric_id: &str,
        value: Value,
    ) -> std::result::Result<(), UpdateError> {
        let url = format!(
            "{}/v1/pages/{}/metrics/{}/data.json",
            self.host, page_id, metric_id
        );
        let payload = MetricUpdate {
            data: MetricPoint {
                timestamp: current_epoch_secs(),
                value,
            },
        };
        debug!("[destination] POST {url} payload: {payload:?}");

        if self.dry_run {
            return Ok(());
        }

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("OAuth {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpdateError::Status { status, body });
        }
        Ok(())
    }
}

fn current_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_secs())
        .unwrap_or(0)
}
