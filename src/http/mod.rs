//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → /health → "ok"
//!     → /check_replicas → security::auth gate → health::ReplicaChecker
//!     → response.rs (report → JSON, 200 or 500)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::{CheckResponse, ReplicaReport, ReplicaResponse};
pub use server::{build_router, AppState, HttpServer, ServerError};
