use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, error};
use reqwest::{header, Client};

use crate::app_config::WikiConfig;

use super::quest_list::{parse_quest_listing, QuestListing};

/// HTTP client for the quest wiki
#[derive(Debug, Clone)]
pub struct WikiClient {
    /// HTTP client for page requests
    client: Client,
    /// Wiki location and identity
    config: WikiConfig,
}

impl WikiClient {
    /// Create a client identifying itself with the configured User-Agent
    pub fn new(config: WikiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build wiki HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// Fetch the raw markup of a page
    ///
    /// Transport errors and non-success statuses are returned as-is; there is
    /// no retry.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self.client
            .get(url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await
            .with_context(|| format!("Failed to fetch wiki page: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            error!("Wiki responded with {} for {}", status, url);
            return Err(anyhow!(
                "Failed to fetch wiki page: {} ({})",
                url,
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        response.text().await
            .with_context(|| format!("Failed to read wiki page body: {}", url))
    }

    /// List the quest transcripts on the wiki's category page
    pub async fn list_quest_transcripts(&self) -> Result<Vec<QuestListing>> {
        let html = self.fetch_page(&self.config.category_url()).await?;
        let listings = parse_quest_listing(&html, &self.config);
        debug!("Found {} quest transcripts", listings.len());
        Ok(listings)
    }
}
