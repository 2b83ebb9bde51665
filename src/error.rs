//! Crate-level error type.
//!
//! Nothing on the evaluation path returns these. They only surface while
//! constructing a monitor or loading its configuration.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors raised while setting up a health monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A Tokio-backed scheduler was requested outside a runtime.
    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for monitor setup.
pub type MonitorResult<T> = Result<T, MonitorError>;
