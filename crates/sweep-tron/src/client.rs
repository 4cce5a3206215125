//! Rate-limited JSON client for a Tron full node's HTTP API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sweep_core::{Result, SweepError};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Spaces requests evenly at `requests_per_second`.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        let per_second = requests_per_second.max(1);
        Self {
            interval: Duration::from_secs(1) / per_second,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Waits for the next free slot.
    pub async fn acquire(&self) {
        let wait = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = (*next).max(now);
            *next = slot + self.interval;
            slot - now
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

/// HTTP client bound to one node.
#[derive(Debug)]
pub struct TronClient {
    http: Client,
    base_url: String,
    limiter: RateLimiter,
}

impl TronClient {
    pub fn new(base_url: &str, requests_per_second: u32) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| SweepError::Config(format!("invalid Tron node URL {base_url}: {e}")))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SweepError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            limiter: RateLimiter::new(requests_per_second),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` to `path` and decodes the JSON answer.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.limiter.acquire().await;
        let url = format!("{}{}", self.base_url, path);
        trace!(%url, "tron request");

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = resp.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SweepError::TransientTransport(format!("{path}: HTTP {status}")));
        }
        if !status.is_success() {
            return Err(SweepError::NodeRejected(format!("{path}: HTTP {status}")));
        }

        resp.json::<R>().await.map_err(|e| {
            if e.is_decode() {
                SweepError::NodeRejected(format!("{path}: malformed response: {e}"))
            } else {
                transport_error(path, e)
            }
        })
    }
}

fn transport_error(path: &str, e: reqwest::Error) -> SweepError {
    if e.is_builder() {
        SweepError::Config(format!("{path}: {e}"))
    } else {
        SweepError::TransientTransport(format!("{path}: {e}"))
    }
}
