//! Retry-aware HTTP fetching behind a small port trait.
//!
//! The scrapers only ever issue idempotent GETs, so the real client retries
//! transient server errors (and connection failures) up to a bounded number
//! of attempts with exponential backoff and jitter. Tests swap in an
//! in-memory implementation.

use crate::common::constants::{
    HTTP_TIMEOUT_SECS, MAX_HTTP_ATTEMPTS, RETRYABLE_STATUS, USER_AGENT,
};
use crate::common::error::Result;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    /// URL after redirects; some sites redirect past-the-end pages home.
    pub final_url: String,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

pub struct RetryingHttp {
    client: reqwest::Client,
}

impl Default for RetryingHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryingHttp {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

#[async_trait]
impl HttpClientPort for RetryingHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let mut attempt: u32 = 1;
        loop {
            match self.client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if RETRYABLE_STATUS.contains(&status) && attempt < MAX_HTTP_ATTEMPTS {
                        warn!(url, status, attempt, "retryable server status");
                        backoff_delay(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    let final_url = resp.url().to_string();
                    let bytes = resp.bytes().await?.to_vec();
                    return Ok(HttpGetResult {
                        status,
                        final_url,
                        bytes,
                    });
                }
                Err(e) if attempt < MAX_HTTP_ATTEMPTS => {
                    warn!(url, attempt, error = %e, "request failed, retrying");
                    backoff_delay(attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Exponential backoff with jitter: 1s, 2s, 4s... plus up to a second.
async fn backoff_delay(attempt: u32) {
    let jitter = rand::thread_rng().gen_range(0..1_000);
    let millis = 1_000u64 * 2u64.pow(attempt - 1) + jitter;
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
