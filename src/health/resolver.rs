//! Replica discovery via IPv6 address resolution.
//!
//! # Responsibilities
//! - Resolve every AAAA address bound to the target host
//! - Bound the lookup in time
//! - Treat an empty answer as a failure distinct from a lookup error

use async_trait::async_trait;
use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;
use thiserror::Error;
use tokio::time;

/// Errors that end a check before any replica is probed.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup itself failed.
    #[error("failed to lookup IPv6 address for {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// The lookup did not finish in time.
    #[error("IPv6 lookup for {host} timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },

    /// The lookup succeeded but returned nothing.
    #[error("no IPv6 addresses found for target host")]
    NoAddresses,
}

/// Source of replica addresses.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Resolve the IPv6 addresses of `host`, in resolver order.
    async fn resolve_ipv6(&self, host: &str) -> Result<Vec<Ipv6Addr>, ResolveError>;
}

/// Resolve `host` and reject an empty address set.
pub async fn resolve_replicas(
    resolver: &dyn Resolve,
    host: &str,
) -> Result<Vec<Ipv6Addr>, ResolveError> {
    let addresses = resolver.resolve_ipv6(host).await?;
    if addresses.is_empty() {
        return Err(ResolveError::NoAddresses);
    }

    tracing::debug!(target_host = %host, count = addresses.len(), "Resolved replicas");
    Ok(addresses)
}

/// Resolver backed by the operating system (getaddrinfo on a blocking thread).
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve_ipv6(&self, host: &str) -> Result<Vec<Ipv6Addr>, ResolveError> {
        if let Ok(addr) = host.parse::<Ipv6Addr>() {
            return Ok(vec![addr]);
        }

        let lookup = tokio::net::lookup_host((host, 0));
        let addrs = match time::timeout(self.timeout, lookup).await {
            Ok(Ok(addrs)) => addrs,
            Ok(Err(source)) => {
                return Err(ResolveError::Lookup {
                    host: host.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(ResolveError::Timeout {
                    host: host.to_string(),
                    timeout: self.timeout,
                })
            }
        };

        Ok(addrs
            .filter_map(|addr| match addr.ip() {
                IpAddr::V6(ip) => Some(ip),
                IpAddr::V4(_) => None,
            })
            .collect())
    }
}

/// Resolver returning a fixed address list.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    addresses: Vec<Ipv6Addr>,
}

impl StaticResolver {
    pub fn new(addresses: Vec<Ipv6Addr>) -> Self {
        Self { addresses }
    }
}

#[async_trait]
impl Resolve for StaticResolver {
    async fn resolve_ipv6(&self, _host: &str) -> Result<Vec<Ipv6Addr>, ResolveError> {
        Ok(self.addresses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_answer_is_no_addresses() {
        let resolver = StaticResolver::default();
        let err = resolve_replicas(&resolver, "svc.internal").await.unwrap_err();
        assert!(matches!(err, ResolveError::NoAddresses));
        assert_eq!(err.to_string(), "no IPv6 addresses found for target host");
    }

    #[tokio::test]
    async fn static_addresses_keep_resolver_order() {
        let addrs: Vec<Ipv6Addr> = vec!["fd00::2".parse().unwrap(), "fd00::1".parse().unwrap()];
        let resolver = StaticResolver::new(addrs.clone());
        assert_eq!(resolve_replicas(&resolver, "svc").await.unwrap(), addrs);
    }

    #[tokio::test]
    async fn system_resolver_passes_through_literals() {
        let resolver = SystemResolver::new(Duration::from_secs(10));
        let addrs = resolver.resolve_ipv6("::1").await.unwrap();
        assert_eq!(addrs, vec![Ipv6Addr::LOCALHOST]);
    }

    #[tokio::test]
    async fn system_resolver_reports_lookup_failure() {
        let resolver = SystemResolver::new(Duration::from_secs(10));
        let result = resolver.resolve_ipv6("does-not-exist.invalid").await;
        assert!(matches!(
            result,
            Err(ResolveError::Lookup { .. }) | Err(ResolveError::Timeout { .. })
        ));
    }
}
