//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the prober.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::{Host, Url};

use crate::config::validation::ValidationError;

/// Root configuration for the replica prober.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Listener configuration (bind host, port).
    pub listener: ListenerConfig,

    /// The logical target whose replicas are probed.
    pub target: TargetConfig,

    /// Token required by `/check_replicas`.
    pub auth: AuthConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Per-replica probe settings.
    pub probe: ProbeSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "::" or "0.0.0.0").
    pub host: String,

    /// Listen port.
    pub port: u16,
}

impl ListenerConfig {
    /// Socket address to bind, bracketing IPv6 hosts.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "::".to_string(),
            port: 8080,
        }
    }
}

/// Target URL configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TargetConfig {
    /// Absolute URL, e.g. "http://app.internal:8000/healthz".
    pub url: String,
}

impl TargetConfig {
    /// Split the target URL into the parts every probe needs.
    ///
    /// `https` targets are accepted; replicas are still probed over plain http
    /// on the URL's port.
    pub fn parse(&self) -> Result<Target, ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingTargetUrl);
        }

        let url = Url::parse(&self.url)
            .map_err(|e| ValidationError::InvalidTargetUrl(format!("{}: {}", self.url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(Host::Ipv4(addr)) => return Err(ValidationError::Ipv4Target(addr.to_string())),
            None => return Err(ValidationError::MissingHost),
        };

        let port = url
            .port_or_known_default()
            .ok_or_else(|| ValidationError::InvalidTargetUrl(self.url.clone()))?;

        Ok(Target {
            host,
            port,
            path: url.path().to_string(),
        })
    }
}

/// A parsed target: hostname to resolve, port and path to probe on each replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Hostname without brackets.
    pub host: String,
    /// Destination port (explicit or the scheme default).
    pub port: u16,
    /// Request path, always starting with `/`.
    pub path: String,
}

/// Authorization configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret callers pass as `auth_token`.
    pub token: String,
}

/// Timeout configuration for resolution and probing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// AAAA lookup timeout in seconds.
    pub resolve_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Overall per-probe timeout (connect + response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            resolve_secs: 10,
            connect_secs: 30,
            request_secs: 30,
        }
    }
}

/// Per-replica probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Maximum number of response body bytes kept per replica.
    pub body_limit: usize,

    /// User-Agent header sent with each probe.
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            body_limit: 128,
            user_agent: concat!("replica-probe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl ObservabilityConfig {
    /// Parsed metrics address, if it is a valid socket address.
    pub fn metrics_socket_addr(&self) -> Option<SocketAddr> {
        self.metrics_address.parse().ok()
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "[::]:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(url: &str) -> Result<Target, ValidationError> {
        TargetConfig { url: url.to_string() }.parse()
    }

    #[test]
    fn target_with_explicit_port_and_path() {
        let t = target("http://replicas.internal:8000/healthz").unwrap();
        assert_eq!(t.host, "replicas.internal");
        assert_eq!(t.port, 8000);
        assert_eq!(t.path, "/healthz");
    }

    #[test]
    fn target_defaults_port_and_path() {
        let t = target("http://replicas.internal").unwrap();
        assert_eq!(t.port, 80);
        assert_eq!(t.path, "/");
    }

    #[test]
    fn target_ipv6_literal_is_unbracketed() {
        let t = target("http://[::1]:9000/status").unwrap();
        assert_eq!(t.host, "::1");
        assert_eq!(t.port, 9000);
    }

    #[test]
    fn https_target_keeps_port_and_path() {
        let t = target("https://replicas.internal:8443/healthz").unwrap();
        assert_eq!(t.host, "replicas.internal");
        assert_eq!(t.port, 8443);
        assert_eq!(t.path, "/healthz");

        assert_eq!(target("https://replicas.internal/").unwrap().port, 443);
    }

    #[test]
    fn target_rejects_ipv4_and_other_schemes() {
        assert!(matches!(target("http://10.0.0.1/"), Err(ValidationError::Ipv4Target(_))));
        assert!(matches!(target("ftp://a.example/"), Err(ValidationError::UnsupportedScheme(_))));
        assert!(matches!(target(""), Err(ValidationError::MissingTargetUrl)));
        assert!(matches!(target("not a url"), Err(ValidationError::InvalidTargetUrl(_))));
    }

    #[test]
    fn listener_brackets_ipv6_host() {
        assert_eq!(ListenerConfig::default().bind_address(), "[::]:8080");
        let v4 = ListenerConfig { host: "127.0.0.1".into(), port: 9 };
        assert_eq!(v4.bind_address(), "127.0.0.1:9");
    }

    #[test]
    fn config_from_partial_toml() {
        let config: ProbeConfig = toml::from_str(
            r#"
            [target]
            url = "http://svc.internal:8000/ping"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.timeouts.resolve_secs, 10);
        assert_eq!(config.probe.body_limit, 128);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.target.url, "http://svc.internal:8000/ping");
    }
}
