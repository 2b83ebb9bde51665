//! Connectivity and session health subsystem.
//!
//! # Data Flow
//! ```text
//! Connectivity events (push):
//!     ConnectivityProvider → monitor.rs → state.rs (set_inputs)
//!
//! Poll (every 30 s, plus once at start):
//!     scheduler → monitor.rs → evaluator.rs (ledger reads)
//!     → state.rs (apply_signals)
//!
//! State machine (state.rs):
//!     HealthStatus + AlertState, auto-hide requested as an effect
//!     → monitor.rs publishes HealthSnapshot (watch channel)
//!     → presenter.rs maps status to color/label/message
//! ```
//!
//! # Design Decisions
//! - Status is a pure function of the three latest inputs
//! - Alert suppression is per incident: dismissing hides the alert until a
//!   different alerting reason appears
//! - Nothing here fails: bad inputs read as "no signal"

pub mod evaluator;
pub mod monitor;
pub mod presenter;
pub mod state;
pub mod types;

pub use evaluator::{classify_quality, classify_session, HealthEvaluator};
pub use monitor::{HealthMonitor, HealthSnapshot, MonitorCapabilities};
pub use presenter::{present, Presentation, StatusColor};
pub use state::{AlertEffect, HealthStateMachine, Transition};
pub use types::{AlertState, ConnectionQuality, HealthReason, HealthSignals, HealthStatus, SessionHealth};
