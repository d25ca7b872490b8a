//! Report encoding.
//!
//! # Responsibilities
//! - Define the JSON wire shape of a replica check
//! - Map a check outcome to status code + body
//!
//! # Design Decisions
//! - Field names are an external contract and never renamed
//! - Both shapes (full report, error-only) carry every field, so the body is always complete
//! - Resolution failures are a server fault (500)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::health::{AggregateReport, ProbeResult, ResolveError};

/// Body of `/check_replicas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaReport {
    pub server_error: Option<String>,
    pub total_replicas: usize,
    pub online_replicas: usize,
    pub offline_replicas: usize,
    pub total_response_time: u64,
    pub replica_responses: Option<Vec<ReplicaResponse>>,
}

/// One replica's entry in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaResponse {
    pub ip_address: String,
    /// 0 when no response headers were received.
    pub status_code: u16,
    pub response_time: u64,
    pub response_body: String,
    pub error: Option<String>,
}

impl ReplicaReport {
    /// Error-only shape: counts zeroed, no per-replica data.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            server_error: Some(message.into()),
            total_replicas: 0,
            online_replicas: 0,
            offline_replicas: 0,
            total_response_time: 0,
            replica_responses: None,
        }
    }
}

impl From<&ProbeResult> for ReplicaResponse {
    fn from(result: &ProbeResult) -> Self {
        Self {
            ip_address: result.address.to_string(),
            status_code: result.status_code.unwrap_or(0),
            response_time: result.response_time_ms(),
            response_body: result.response_body.clone(),
            error: result.error.clone(),
        }
    }
}

impl From<AggregateReport> for ReplicaReport {
    fn from(report: AggregateReport) -> Self {
        Self {
            server_error: None,
            total_replicas: report.total_replicas,
            online_replicas: report.online_replicas,
            offline_replicas: report.offline_replicas,
            total_response_time: report.total_response_time_ms,
            replica_responses: Some(report.replicas.iter().map(ReplicaResponse::from).collect()),
        }
    }
}

/// Result of a check, ready to be written to the client.
#[derive(Debug)]
pub struct CheckResponse(pub Result<AggregateReport, ResolveError>);

impl IntoResponse for CheckResponse {
    fn into_response(self) -> Response {
        match self.0 {
            Ok(report) => (StatusCode::OK, Json(ReplicaReport::from(report))).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReplicaReport::server_error(e.to_string())),
            )
                .into_response(),
        }
    }
}
