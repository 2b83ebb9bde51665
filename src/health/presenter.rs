//! Display mapping for health status.

use serde::Serialize;

use crate::health::types::{HealthReason, HealthStatus};

pub const OFFLINE_MESSAGE: &str = "You are currently offline. The app will continue to work with cached data and sync when connection is restored.";
pub const POOR_CONNECTION_MESSAGE: &str =
    "Connection quality is poor. Some features may be slower than usual.";
pub const SESSION_STALE_MESSAGE: &str =
    "Your session has been inactive for a while. Please refresh if you experience any issues.";

/// Badge color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Success,
    Warning,
    Danger,
}

/// What the rendering layer shows for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub color: StatusColor,
    pub label: &'static str,
    /// Alert text; `None` for badge-only rows.
    pub message: Option<&'static str>,
}

/// Map a status to its display tuple.
pub fn present(status: &HealthStatus) -> Presentation {
    present_reason(status.reason())
}

pub(crate) fn present_reason(reason: HealthReason) -> Presentation {
    let (color, label, message) = match reason {
        HealthReason::Offline => (StatusColor::Danger, "Offline", Some(OFFLINE_MESSAGE)),
        HealthReason::PoorConnection => (
            StatusColor::Warning,
            "Poor Connection",
            Some(POOR_CONNECTION_MESSAGE),
        ),
        HealthReason::SessionStale => (
            StatusColor::Warning,
            "Session Stale",
            Some(SESSION_STALE_MESSAGE),
        ),
        HealthReason::SessionInactive => (StatusColor::Warning, "Session Inactive", None),
        HealthReason::Online => (StatusColor::Success, "Online", None),
    };
    Presentation {
        color,
        label,
        message,
    }
}
