//! Page fetch collaborator wrapping reqwest.
//!
//! One GET per check cycle, no retry or backoff at this layer; a failed
//! fetch is simply no new information until the next cycle. Falls back to
//! HTTP/1.1 when a site rejects HTTP/2.

use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// HTTP client for page checks.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    /// HTTP/1.1-only fallback client for sites that reject HTTP/2.
    h1_client: reqwest::Client,
}

impl PageFetcher {
    /// Create a fetcher with a standard Chrome user-agent.
    pub fn new(timeout_ms: u64) -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        let h1_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .http1_only()
            .build()
            .unwrap_or_default();

        Self { client, h1_client }
    }

    /// Fetch a page body as text.
    ///
    /// Non-2xx responses still return their body; plenty of storefronts
    /// serve real product markup alongside odd status codes, and the
    /// extraction cascade decides whether anything useful is in there.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        match self.fetch_inner(&self.client, url).await {
            Ok(body) => Ok(body),
            Err(e) => {
                let err_str = format!("{e:#}");
                if err_str.contains("http2")
                    || err_str.contains("protocol")
                    || err_str.contains("connection closed")
                {
                    self.fetch_inner(&self.h1_client, url).await
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn fetch_inner(&self, client: &reqwest::Client, url: &str) -> Result<String> {
        let resp = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "non-success status on price check");
        }

        resp.text()
            .await
            .with_context(|| format!("reading body of {url}"))
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}
