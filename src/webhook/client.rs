use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::Client;
use std::time::Duration;

use crate::form::LeadRecord;

/// Client for the lead-collection webhook. One JSON POST per confirmed
/// session; any non-2xx status or transport error is a failure the user can
/// retry from the summary card.
#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    client: Client,
}

impl WebhookClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("intake-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { url, client })
    }

    pub async fn submit(&self, record: &LeadRecord) -> Result<()> {
        debug!("Posting lead record {} to {}", record.session_id, self.url);

        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .context("Failed to reach webhook endpoint")?;

        let status = response.status();
        if status.is_success() {
            info!("Webhook accepted lead record {}", record.session_id);
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Webhook failed with status {}: {}", status, error_text)
        }
    }
}
