//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, ordered thresholds)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::MonitorConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("session_warning_secs ({warning}) must be less than session_stale_secs ({stale})")]
    SessionThresholdOrder { warning: u64, stale: u64 },

    #[error("store.path must not be empty")]
    EmptyStorePath,
}

/// Check a configuration, collecting every violation.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let thresholds = &config.thresholds;

    if config.timing.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero { field: "timing.poll_interval_ms" });
    }
    if config.timing.auto_hide_ms == 0 {
        errors.push(ValidationError::Zero { field: "timing.auto_hide_ms" });
    }
    if thresholds.error_window_secs == 0 {
        errors.push(ValidationError::Zero { field: "thresholds.error_window_secs" });
    }
    if thresholds.session_warning_secs == 0 {
        errors.push(ValidationError::Zero { field: "thresholds.session_warning_secs" });
    }
    if thresholds.session_warning_secs >= thresholds.session_stale_secs {
        errors.push(ValidationError::SessionThresholdOrder {
            warning: thresholds.session_warning_secs,
            stale: thresholds.session_stale_secs,
        });
    }
    if config.store.path.trim().is_empty() {
        errors.push(ValidationError::EmptyStorePath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&MonitorConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = MonitorConfig::default();
        config.timing.poll_interval_ms = 0;
        config.thresholds.session_warning_secs = 7200;
        config.store.path = "  ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::Zero { field: "timing.poll_interval_ms" },
                ValidationError::SessionThresholdOrder { warning: 7200, stale: 3600 },
                ValidationError::EmptyStorePath,
            ]
        );
    }
}
