//! Connectivity and session health monitor.
//!
//! Fuses network reachability, recency of successful API calls and the
//! recent API failure rate into one debounced health status, and manages
//! the lifecycle of the user-facing alert derived from it.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod health;
pub mod ledger;
pub mod observability;
pub mod scheduler;
pub mod time;

pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResult};
pub use health::{HealthMonitor, HealthSnapshot, MonitorCapabilities};
