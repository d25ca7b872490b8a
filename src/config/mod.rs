//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (CONFIG_PATH)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (TARGET_URL, AUTH_TOKEN, PORT, ...)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable)
//!     → each subsystem receives only the fields it needs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Invalid configuration is fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProbeConfig, ProbeSettings,
    Target, TargetConfig, TimeoutConfig,
};
pub use validation::ValidationError;
