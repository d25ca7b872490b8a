//! Shared utilities for integration testing.

use async_trait::async_trait;
use std::future::Future;
use std::net::{Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use replica_probe::config::ProbeConfig;
use replica_probe::health::{Resolve, ResolveError};

pub const TOKEN: &str = "abcdEFGH12345678";

/// Minimal valid configuration pointing at `port` on `host`.
#[allow(dead_code)]
pub fn test_config(host: &str, port: u16) -> ProbeConfig {
    let mut config = ProbeConfig::default();
    config.target.url = format!("http://{}:{}/healthz", host, port);
    config.auth.token = TOKEN.to_string();
    config
}

/// Start a programmable backend on [::1]; returns its address.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("[::1]:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response_str = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Resolver whose lookup always fails.
#[allow(dead_code)]
pub struct FailingResolver;

#[async_trait]
impl Resolve for FailingResolver {
    async fn resolve_ipv6(&self, host: &str) -> Result<Vec<Ipv6Addr>, ResolveError> {
        Err(ResolveError::Lookup {
            host: host.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "servfail"),
        })
    }
}

/// Resolver that counts lookups and returns a fixed answer.
#[allow(dead_code)]
pub struct CountingResolver {
    pub addresses: Vec<Ipv6Addr>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingResolver {
    pub fn new(addresses: Vec<Ipv6Addr>) -> Self {
        Self {
            addresses,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolve for CountingResolver {
    async fn resolve_ipv6(&self, _host: &str) -> Result<Vec<Ipv6Addr>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.addresses.clone())
    }
}
