//! Result aggregation.
//!
//! # Responsibilities
//! - Order per-replica results by address
//! - Classify each replica as online or offline
//! - Sum latency across replicas
//!
//! # Design Decisions
//! - Pure function of the collected results (no I/O)
//! - Stable sort on address octets so completion order never leaks into the report
//! - A replica is online only with no error and a 2xx status

use std::net::Ipv6Addr;
use std::time::Duration;

/// Outcome of probing a single replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Address the replica was probed at.
    pub address: Ipv6Addr,
    /// HTTP status, if response headers were received.
    pub status_code: Option<u16>,
    /// Wall time from dispatch until the probe finished, successful or not.
    pub response_time: Duration,
    /// At most `body_limit` bytes of the response body.
    pub response_body: String,
    /// Transport or read failure.
    pub error: Option<String>,
}

impl ProbeResult {
    /// A result for a probe that never produced a response.
    pub fn failed(address: Ipv6Addr, response_time: Duration, error: impl Into<String>) -> Self {
        Self {
            address,
            status_code: None,
            response_time,
            response_body: String::new(),
            error: Some(error.into()),
        }
    }

    /// Online iff no error was recorded and the status is in [200, 299].
    pub fn is_online(&self) -> bool {
        self.error.is_none() && matches!(self.status_code, Some(200..=299))
    }

    /// Latency in whole milliseconds, as reported externally.
    pub fn response_time_ms(&self) -> u64 {
        u64::try_from(self.response_time.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Summary of one check across every resolved replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    pub total_replicas: usize,
    pub online_replicas: usize,
    pub offline_replicas: usize,
    /// Sum of every replica's latency in milliseconds.
    pub total_response_time_ms: u64,
    /// Results sorted ascending by address.
    pub replicas: Vec<ProbeResult>,
}

/// Sort the collected results and compute the summary.
pub fn aggregate(mut results: Vec<ProbeResult>) -> AggregateReport {
    results.sort_by(|a, b| a.address.octets().cmp(&b.address.octets()));

    let online_replicas = results.iter().filter(|r| r.is_online()).count();
    let total_response_time_ms = results
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.response_time_ms()));

    AggregateReport {
        total_replicas: results.len(),
        online_replicas,
        offline_replicas: results.len() - online_replicas,
        total_response_time_ms,
        replicas: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(addr: &str, status: u16, ms: u64) -> ProbeResult {
        ProbeResult {
            address: addr.parse().unwrap(),
            status_code: Some(status),
            response_time: Duration::from_millis(ms),
            response_body: "ok".into(),
            error: None,
        }
    }

    #[test]
    fn classifies_status_ranges() {
        assert!(ok("::1", 200, 1).is_online());
        assert!(ok("::1", 299, 1).is_online());
        assert!(!ok("::1", 199, 1).is_online());
        assert!(!ok("::1", 300, 1).is_online());
        assert!(!ok("::1", 404, 1).is_online());
        assert!(!ok("::1", 503, 1).is_online());
    }

    #[test]
    fn error_is_offline_even_with_success_status() {
        let mut r = ok("::1", 200, 1);
        r.error = Some("connection reset".into());
        assert!(!r.is_online());

        let failed = ProbeResult::failed("::1".parse().unwrap(), Duration::ZERO, "refused");
        assert!(!failed.is_online());
        assert_eq!(failed.status_code, None);
    }

    #[test]
    fn sorts_by_address_and_sums() {
        let report = aggregate(vec![
            ok("2001:db8::3", 200, 30),
            ProbeResult::failed("2001:db8::1".parse().unwrap(), Duration::from_millis(7), "timeout"),
            ok("2001:db8::2", 404, 12),
            ok("fd00::1", 204, 5),
        ]);

        let order: Vec<String> = report.replicas.iter().map(|r| r.address.to_string()).collect();
        assert_eq!(order, ["2001:db8::1", "2001:db8::2", "2001:db8::3", "fd00::1"]);
        assert_eq!(report.total_replicas, 4);
        assert_eq!(report.online_replicas, 2);
        assert_eq!(report.offline_replicas, 2);
        assert_eq!(report.total_response_time_ms, 54);
        assert_eq!(
            report.online_replicas + report.offline_replicas,
            report.total_replicas
        );
    }

    #[test]
    fn total_is_sum_of_reported_millis() {
        let mut a = ok("::1", 200, 0);
        a.response_time = Duration::from_micros(1_900);
        let mut b = ok("::2", 200, 0);
        b.response_time = Duration::from_micros(2_900);

        let report = aggregate(vec![a, b]);
        let summed: u64 = report.replicas.iter().map(ProbeResult::response_time_ms).sum();
        assert_eq!(report.total_response_time_ms, summed);
        assert_eq!(summed, 3);
    }

    #[test]
    fn sort_is_stable_for_equal_addresses() {
        let mut first = ok("::1", 200, 1);
        first.response_body = "first".into();
        let mut second = ok("::1", 200, 1);
        second.response_body = "second".into();

        let report = aggregate(vec![first, ok("::", 200, 1), second]);
        let bodies: Vec<&str> = report.replicas.iter().map(|r| r.response_body.as_str()).collect();
        assert_eq!(bodies, ["ok", "first", "second"]);
    }
}
