//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every field has a default, so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the health monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Classification thresholds for session health and connection quality.
    pub thresholds: ThresholdConfig,

    /// Poll and alert timing.
    pub timing: TimingConfig,

    /// Where the activity ledger lives.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Thresholds used by the health evaluator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Inactivity at or above this many seconds marks the session as `Warning`.
    pub session_warning_secs: u64,

    /// Inactivity at or above this many seconds marks the session as `Stale`.
    pub session_stale_secs: u64,

    /// Trailing window, in seconds, over which API failures are counted.
    pub error_window_secs: u32,

    /// Connection quality is `Poor` when the windowed failure count exceeds this.
    pub poor_error_threshold: u32,
}

impl ThresholdConfig {
    pub fn session_warning(&self) -> Duration {
        Duration::from_secs(self.session_warning_secs)
    }

    pub fn session_stale(&self) -> Duration {
        Duration::from_secs(self.session_stale_secs)
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            session_warning_secs: 30 * 60,
            session_stale_secs: 60 * 60,
            error_window_secs: 300,
            poor_error_threshold: 3,
        }
    }
}

/// Poll cadence and alert timing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Interval between health evaluations in milliseconds.
    pub poll_interval_ms: u64,

    /// Delay before the alert hides after connectivity returns, in milliseconds.
    pub auto_hide_ms: u64,
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 30_000,
            auto_hide_ms: 3_000,
        }
    }
}

/// Activity ledger location.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the JSON key-value file written by the API client.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "health-ledger.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = MonitorConfig::default();
        assert_eq!(config.thresholds.session_warning(), Duration::from_secs(1800));
        assert_eq!(config.thresholds.session_stale(), Duration::from_secs(3600));
        assert_eq!(config.thresholds.error_window_secs, 300);
        assert_eq!(config.thresholds.poor_error_threshold, 3);
        assert_eq!(config.timing.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.timing.auto_hide(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [timing]
            auto_hide_ms = 5000

            [store]
            path = "/tmp/ledger.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.auto_hide_ms, 5000);
        assert_eq!(config.timing.poll_interval_ms, 30_000);
        assert_eq!(config.store.path, "/tmp/ledger.json");
        assert_eq!(config.thresholds, ThresholdConfig::default());
    }
}
