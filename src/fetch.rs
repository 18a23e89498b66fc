use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Shared HTTP seam for both the listing API and article pages.
pub struct Fetcher {
    http: reqwest::Client,
    api_url: Url,
}

impl Fetcher {
    pub fn new(base: &Url) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        let api_url = base
            .join("/api/v1/posts")
            .context("Failed to build listing API URL")?;
        Ok(Self { http, api_url })
    }

    /// One page of the post listing. Any HTTP or network failure propagates:
    /// the listing is load-bearing and a gap would silently truncate the
    /// archive.
    pub async fn listing_page(&self, limit: usize, offset: u64) -> Result<Value> {
        debug!("GET {} limit={} offset={}", self.api_url, limit, offset);
        let value = self
            .http
            .get(self.api_url.clone())
            .query(&[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("sort", "new".to_string()),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode listing page as JSON")?;
        Ok(value)
    }

    /// One article page, as HTML text. Errors are returned to the caller;
    /// the enrichment pass decides they are non-fatal.
    pub async fn article(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}
