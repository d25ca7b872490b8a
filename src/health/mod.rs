//! Replica health checking subsystem.
//!
//! # Data Flow
//! ```text
//! check request
//!     → resolver.rs (hostname → IPv6 addresses, bounded lookup)
//!     → fanout.rs (one probe task per address, join all)
//!     → prober.rs (single GET per replica, bounded body capture)
//!     → aggregate.rs (sort by address, online/offline counts, latency sum)
//!     → AggregateReport
//! ```
//!
//! # Design Decisions
//! - Resolution failure is fatal for the check; probe failures are per-replica
//! - Resolver and prober are trait seams so the coordinator can be driven by fakes
//! - Nothing is kept between checks

pub mod aggregate;
pub mod fanout;
pub mod prober;
pub mod resolver;

pub use aggregate::{aggregate, AggregateReport, ProbeResult};
pub use fanout::{probe_all, ReplicaChecker};
pub use prober::{build_client, HttpProber, Probe};
pub use resolver::{resolve_replicas, Resolve, ResolveError, StaticResolver, SystemResolver};
