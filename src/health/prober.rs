//! Single-replica HTTP probing.
//!
//! # Responsibilities
//! - Issue exactly one GET to `http://[address]:port/path`
//! - Capture status, a bounded prefix of the body, latency and errors
//!
//! # Design Decisions
//! - One shared client per process; timeouts live on the client
//! - No retries: each replica gets one attempt per check
//! - Bytes past the body limit are dropped without error
//! - Latency is recorded on every path, including failures

use async_trait::async_trait;
use std::net::Ipv6Addr;
use std::time::{Duration, Instant};

use crate::config::{Target, TimeoutConfig};
use crate::health::aggregate::ProbeResult;
use crate::observability::metrics;

/// Probes one replica address.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, address: Ipv6Addr) -> ProbeResult;
}

/// Build the HTTP client shared by every probe.
pub fn build_client(timeouts: &TimeoutConfig, user_agent: &str) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .user_agent(user_agent)
        .no_proxy()
        .build()
}

/// URL of the target path on one replica.
pub fn replica_url(address: Ipv6Addr, port: u16, path: &str) -> String {
    format!("http://[{}]:{}{}", address, port, path)
}

/// HTTP prober for the configured target port and path.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    port: u16,
    path: String,
    body_limit: usize,
}

impl HttpProber {
    pub fn new(client: reqwest::Client, target: &Target, body_limit: usize) -> Self {
        Self {
            client,
            port: target.port,
            path: target.path.clone(),
            body_limit,
        }
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, address: Ipv6Addr) -> ProbeResult {
        let url = replica_url(address, self.port, &self.path);
        let start = Instant::now();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                let message = describe_error(&e);
                tracing::warn!(address = %address, error = %message, "Probe failed: request error");
                let result = ProbeResult::failed(address, start.elapsed(), message);
                metrics::record_probe(&result);
                return result;
            }
        };

        let status = response.status();
        let (body, error) = match read_limited(response, self.body_limit).await {
            Ok(body) => (body, None),
            Err((partial, e)) => {
                let message = describe_error(&e);
                tracing::warn!(address = %address, status = %status, error = %message, "Probe failed: body read error");
                (partial, Some(message))
            }
        };

        let result = ProbeResult {
            address,
            status_code: Some(status.as_u16()),
            response_time: start.elapsed(),
            response_body: String::from_utf8_lossy(&body).into_owned(),
            error,
        };

        tracing::debug!(
            address = %address,
            status = %status,
            elapsed_ms = result.response_time_ms(),
            "Probe completed"
        );
        metrics::record_probe(&result);
        result
    }
}

/// Render a client error with its whole source chain, joined by `": "`.
///
/// Links already contained in the text so far are skipped.
pub fn describe_error(e: &reqwest::Error) -> String {
    let mut message = if e.is_timeout() {
        format!("timeout: {}", e)
    } else if e.is_connect() {
        format!("connect error: {}", e)
    } else {
        e.to_string()
    };

    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

/// Read at most `limit` bytes of the body, discarding the rest.
///
/// On failure the bytes read so far are returned alongside the error.
async fn read_limited(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, (Vec<u8>, reqwest::Error)> {
    let mut body = Vec::with_capacity(limit.min(4096));

    while body.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(limit - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => return Err((body, e)),
        }
    }

    Ok(body)
}
