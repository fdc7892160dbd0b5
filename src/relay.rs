use anyhow::Result;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{Config, MetricDefinition};
use crate::destination::DestinationClient;
use crate::error::UpdateError;
use crate::source::SourceClient;

/// The polling loop: fetch each configured metric from the source API and
/// push it to the destination, forever, on a fixed interval.
///
/// One metric failing never aborts the cycle or the process. The failure is
/// logged and simply recurs on the next cycle, rate-limited by the interval.
pub struct Relay {
    source: SourceClient,
    destination: DestinationClient,
    metrics: Vec<MetricDefinition>,
    delay: Duration,
}

impl Relay {
    pub fn new(config: &Config, dry_run: bool) -> Result<Self> {
        let timeout = config.request_timeout();
        Ok(Self {
            source: SourceClient::new(&config.source_api_host, &config.source_api_token, timeout)?,
            destination: DestinationClient::new(
                &config.destination_api_host,
                &config.destination_api_key,
                timeout,
                dry_run,
            )?,
            metrics: config.metrics.clone(),
            delay: config.update_delay(),
        })
    }

    pub async fn run(&self) {
        info!("[relay] starting, {} metrics configured", self.metrics.len());
        loop {
            self.run_cycle().await;
            debug!(
                "[relay] all metrics attempted, next update in {}ms",
                self.delay.as_millis()
            );
            sleep(self.delay).await;
        }
    }

    /// One pass over every configured metric, in list order.
    pub async fn run_cycle(&self) {
        for metric in &self.metrics {
            debug!("[relay] updating metric \"{}\"", metric.description);
            match self.update_metric(metric).await {
                Ok(value) => {
                    info!(
                        "[relay] metric \"{}\" value updated to {}",
                        metric.description, value
                    );
                }
                Err(err) => {
                    warn!(
                        "[relay] failed to update metric \"{}\": {}",
                        metric.description, err
                    );
                }
            }
        }
    }

    async fn update_metric(&self, metric: &MetricDefinition) -> Result<Value, UpdateError> {
        let value = self
            .source
            .fetch_value(&metric.source_dashboard_id, &metric.source_widget_id)
            .await?;
        self.destination
            .push_value(
                &metric.destination_page_id,
                &metric.destination_metric_id,
                value.clone(),
            )
            .await?;
        Ok(value)
    }
}
