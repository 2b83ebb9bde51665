//! Health metrics.
//!
//! # Metrics
//! - `health_evaluations_total` (counter): evaluator ticks
//! - `health_connectivity_changes_total` (counter): by `online`
//! - `health_alerts_shown_total` (counter): by `reason`
//! - `health_status` (gauge): 1 for the current `reason`, 0 for the others

use crate::health::types::HealthReason;

const ALL_REASONS: [HealthReason; 5] = [
    HealthReason::Offline,
    HealthReason::PoorConnection,
    HealthReason::SessionStale,
    HealthReason::SessionInactive,
    HealthReason::Online,
];

pub fn record_evaluation() {
    metrics::counter!("health_evaluations_total").increment(1);
}

pub fn record_connectivity_change(online: bool) {
    let label = if online { "true" } else { "false" };
    metrics::counter!("health_connectivity_changes_total", "online" => label).increment(1);
}

pub fn record_alert_shown(reason: HealthReason) {
    metrics::counter!("health_alerts_shown_total", "reason" => reason.as_str()).increment(1);
}

pub fn record_health_status(current: HealthReason) {
    for reason in ALL_REASONS {
        let value = if reason == current { 1.0 } else { 0.0 };
        metrics::gauge!("health_status", "reason" => reason.as_str()).set(value);
    }
}
