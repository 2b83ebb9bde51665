//! Periodic health evaluation.
//!
//! # Responsibilities
//! - Classify session health from time since the last successful call
//! - Classify connection quality from the recent failure count
//!
//! The cadence lives in the monitor; `evaluate` is one synchronous tick.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ThresholdConfig;
use crate::health::types::{ConnectionQuality, HealthSignals, SessionHealth};
use crate::ledger::ActivityLedger;
use crate::time::Clock;

/// `Stale` at or above the stale threshold, `Warning` from the warning
/// threshold up to it, else `Good`. No recorded activity is `Good`.
pub fn classify_session(inactivity: Option<Duration>, thresholds: &ThresholdConfig) -> SessionHealth {
    match inactivity {
        Some(idle) if idle >= thresholds.session_stale() => SessionHealth::Stale,
        Some(idle) if idle >= thresholds.session_warning() => SessionHealth::Warning,
        _ => SessionHealth::Good,
    }
}

/// `Poor` strictly above the threshold.
pub fn classify_quality(error_count: u32, thresholds: &ThresholdConfig) -> ConnectionQuality {
    if error_count > thresholds.poor_error_threshold {
        ConnectionQuality::Poor
    } else {
        ConnectionQuality::Good
    }
}

/// Reads the ledger and turns it into `HealthSignals`.
#[derive(Clone)]
pub struct HealthEvaluator {
    ledger: Arc<dyn ActivityLedger>,
    clock: Arc<dyn Clock>,
    thresholds: ThresholdConfig,
}

impl HealthEvaluator {
    pub fn new(ledger: Arc<dyn ActivityLedger>, clock: Arc<dyn Clock>, thresholds: ThresholdConfig) -> Self {
        Self {
            ledger,
            clock,
            thresholds,
        }
    }

    pub fn evaluate(&self) -> HealthSignals {
        let now = self.clock.now();

        let inactivity = self
            .ledger
            .read_last_activity()
            .map(|last| now.saturating_elapsed_since(last));
        let session_health = classify_session(inactivity, &self.thresholds);

        let error_count = self
            .ledger
            .read_recent_error_count(self.thresholds.error_window_secs, now);
        let connection_quality = classify_quality(error_count, &self.thresholds);

        tracing::debug!(
            inactivity_secs = inactivity.map(|d| d.as_secs()),
            error_count,
            ?session_health,
            ?connection_quality,
            "Health evaluated"
        );

        HealthSignals {
            session_health,
            connection_quality,
        }
    }
}
