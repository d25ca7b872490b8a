//! Replica health-probe aggregator library.
//!
//! Resolves every IPv6 address behind a target hostname, probes each replica
//! over HTTP concurrently, and reports how many are healthy.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ProbeConfig;
pub use health::ReplicaChecker;
pub use http::HttpServer;
