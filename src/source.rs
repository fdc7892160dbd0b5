use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::UpdateError;

// Source API tokens are strange: the token goes in as the basic-auth
// username, with this fixed literal as the password.
const TOKEN_PASSWORD: &str = "token";

/// Read-only client for the source monitoring API.
pub struct SourceClient {
    client: Client,
    host: String,
    token: String,
}

impl SourceClient {
    pub fn new(host: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client for the source API")?;
        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch the current value of a single dashboard widget.
    pub async fn fetch_value(
        &self,
        dashboard_id: &str,
        widget_id: &str,
    ) -> std::result::Result<Value, UpdateError> {
        let url = format!(
            "{}/api/dashboards/{}/widgets/{}/value",
            self.host, dashboard_id, widget_id
        );
        debug!("[source] GET {url}");

        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.token, Some(TOKEN_PASSWORD))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpdateError::Status { status, body });
        }

        let body: Value = resp.json().await?;
        let value = body
            .get("result")
            .cloned()
            .ok_or(UpdateError::MissingField("result"))?;
        if !value.is_number() {
            return Err(UpdateError::NotNumeric {
                field: "result",
                value,
            });
        }

        debug!("[source] result: {value}");
        Ok(value)
    }
}
