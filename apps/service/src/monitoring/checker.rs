use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;

use super::types::ProbeOutcome;

/// One bounded reachability check against a URL.
///
/// Implementations never fail: every error is folded into the outcome.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HTTP/HTTPS prober: a single GET, redirects followed.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sitewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                let latency_ms = start.elapsed().as_millis() as u64;

                // 2xx and 3xx count as reachable
                if status.is_success() || status.is_redirection() {
                    ProbeOutcome::Up { status_code: status.as_u16(), latency_ms }
                } else {
                    ProbeOutcome::UnexpectedStatus { status_code: status.as_u16() }
                }
            }
            Err(e) if e.is_timeout() => ProbeOutcome::Timeout,
            Err(e) => ProbeOutcome::connection_error(e.to_string()),
        }
    }
}
