//! Health classification types.

use serde::Serialize;

/// Session staleness derived from time since the last successful API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionHealth {
    #[default]
    Good,
    Warning,
    Stale,
}

/// Connection quality derived from the recent failure count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionQuality {
    #[default]
    Good,
    Poor,
}

/// Output of one evaluator tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HealthSignals {
    pub session_health: SessionHealth,
    pub connection_quality: ConnectionQuality,
}

/// Combined health, always replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub is_online: bool,
    pub connection_quality: ConnectionQuality,
    pub session_health: SessionHealth,
}

impl HealthStatus {
    pub fn new(is_online: bool, signals: HealthSignals) -> Self {
        Self {
            is_online,
            connection_quality: signals.connection_quality,
            session_health: signals.session_health,
        }
    }

    /// The highest-priority condition in effect. Offline beats poor
    /// connection, which beats a stale session, which beats an inactive one.
    pub fn reason(&self) -> HealthReason {
        if !self.is_online {
            HealthReason::Offline
        } else if self.connection_quality == ConnectionQuality::Poor {
            HealthReason::PoorConnection
        } else if self.session_health == SessionHealth::Stale {
            HealthReason::SessionStale
        } else if self.session_health == SessionHealth::Warning {
            HealthReason::SessionInactive
        } else {
            HealthReason::Online
        }
    }
}

/// Which row of the display table a status falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthReason {
    Offline,
    PoorConnection,
    SessionStale,
    SessionInactive,
    Online,
}

impl HealthReason {
    /// Reasons that carry an alert message and can raise the alert.
    pub fn is_alerting(self) -> bool {
        matches!(
            self,
            HealthReason::Offline | HealthReason::PoorConnection | HealthReason::SessionStale
        )
    }

    /// Stable identifier for logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            HealthReason::Offline => "offline",
            HealthReason::PoorConnection => "poor_connection",
            HealthReason::SessionStale => "session_stale",
            HealthReason::SessionInactive => "session_inactive",
            HealthReason::Online => "online",
        }
    }
}

impl std::fmt::Display for HealthReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of the user-facing health alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AlertState {
    pub visible: bool,
    pub dismissed_by_user: bool,
}
