use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::TARGET_WEB_REQUEST;

/// Sent on every page fetch; many sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Retrieves the raw HTML of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        info!(target: TARGET_WEB_REQUEST, "GET {} returned {}", url, status);
        if !status.is_success() {
            return Err(AppError::FetchError(format!("{} responded with status {}", url, status)));
        }

        let html = response.text().await?;
        debug!(target: TARGET_WEB_REQUEST, "Fetched {} bytes in {:?}", html.len(), start.elapsed());
        Ok(html)
    }
}
