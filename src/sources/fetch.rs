use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HarvestError, Result},
};

#[cfg(test)]
use mockall::automock;

/// Retrieves the raw document behind a locator (usually a URL).
///
/// Implementations apply their own timeout and report failure instead of
/// hanging.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, locator: &str) -> Result<String> {
        debug!("GET {}", locator);

        let response = self
            .client
            .get(locator)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/json;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Fetch {
                locator: locator.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), locator);
        Ok(body)
    }
}
