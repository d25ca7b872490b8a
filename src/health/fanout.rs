//! Concurrent fan-out across replicas.
//!
//! # Responsibilities
//! - Spawn one probe task per resolved address before awaiting any
//! - Wait for every task (join barrier, never a race)
//! - Hand the complete result set to the aggregator
//!
//! # Design Decisions
//! - Each task owns exactly one output slot (its JoinHandle), so writes need no lock
//! - Tasks are detached from the caller: dropping the request does not cancel probes
//! - A failed sibling never cancels the others; only per-probe timeouts bound the wait

use futures_util::future::join_all;
use std::net::Ipv6Addr;
use std::sync::Arc;
use std::time::Duration;

use crate::health::aggregate::{aggregate, AggregateReport, ProbeResult};
use crate::health::prober::Probe;
use crate::health::resolver::{resolve_replicas, Resolve, ResolveError};
use crate::observability::metrics;

/// Probe every address concurrently; results come back in input order.
pub async fn probe_all(prober: Arc<dyn Probe>, addresses: &[Ipv6Addr]) -> Vec<ProbeResult> {
    let handles: Vec<_> = addresses
        .iter()
        .map(|&address| {
            let prober = Arc::clone(&prober);
            tokio::spawn(async move { prober.probe(address).await })
        })
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .zip(addresses)
        .map(|(joined, &address)| match joined {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Probe task failed");
                ProbeResult::failed(address, Duration::ZERO, format!("probe task failed: {}", e))
            }
        })
        .collect()
}

/// Resolves the target host, probes every replica and aggregates the results.
pub struct ReplicaChecker {
    resolver: Arc<dyn Resolve>,
    prober: Arc<dyn Probe>,
    host: String,
}

impl ReplicaChecker {
    pub fn new(resolver: Arc<dyn Resolve>, prober: Arc<dyn Probe>, host: impl Into<String>) -> Self {
        Self {
            resolver,
            prober,
            host: host.into(),
        }
    }

    /// Run one full check.
    ///
    /// Resolution failures abort the check before any probe is sent.
    pub async fn check(&self) -> Result<AggregateReport, ResolveError> {
        let addresses = match resolve_replicas(self.resolver.as_ref(), &self.host).await {
            Ok(addresses) => addresses,
            Err(e) => {
                tracing::error!(target_host = %self.host, error = %e, "Replica resolution failed");
                metrics::record_check_failure();
                return Err(e);
            }
        };

        let results = probe_all(Arc::clone(&self.prober), &addresses).await;
        let report = aggregate(results);

        tracing::info!(
            target_host = %self.host,
            total = report.total_replicas,
            online = report.online_replicas,
            offline = report.offline_replicas,
            total_response_time_ms = report.total_response_time_ms,
            "Replica check completed"
        );
        metrics::record_check(&report);

        Ok(report)
    }
}
