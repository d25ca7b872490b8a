//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Build server → Bind listener
//!
//! Shutdown (signals.rs → http::server):
//!     SIGTERM/SIGINT → Stop accepting → Drain in-flight checks → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

pub mod signals;

pub use signals::wait_for_signal;
