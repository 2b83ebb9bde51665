//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! health monitor produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured logging with fields, not formatted strings
//! - Metrics go through the `metrics` facade; the host installs a recorder
//!   if it wants them exported, otherwise they are no-ops

pub mod logging;
pub mod metrics;
