//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! /check_replicas request
//!     → auth.rs (hash provided token, fixed-time compare)
//!     → 401 Unauthorized, or pass through to the handler
//! ```
//!
//! # Design Decisions
//! - Only the digest of the secret is held in memory after startup
//! - Rejection happens before any resolution or probing

pub mod auth;

pub use auth::{require_token, TokenGate};
