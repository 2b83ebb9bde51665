//! Health state machine.
//!
//! # States
//! - Combined `HealthStatus` from connectivity and the latest evaluator signals
//! - `AlertState` plus the incident (alerting reason) currently on display
//!
//! # Alert Transitions
//! ```text
//! reason becomes alerting and differs from incident → new incident: visible, undismissed
//! online false → true, nothing alerting             → schedule auto-hide
//! auto-hide fires (same generation)                 → hidden
//! alerting reason clears without reconnect          → hidden
//! dismiss                                           → hidden, dismissed (until next incident)
//! ```
//!
//! # Design Decisions
//! - No timers here: scheduling is returned as an `AlertEffect` for the
//!   monitor to carry out, so every transition is testable synchronously
//! - Auto-hide timers carry a generation; stale firings are ignored
//! - Identical inputs are a no-op, so repeated host events never re-raise

use crate::health::types::{AlertState, HealthReason, HealthSignals, HealthStatus};

/// Timer work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEffect {
    None,
    /// Arm the auto-hide timer; pass `generation` back to `auto_hide_elapsed`.
    ScheduleAutoHide { generation: u64 },
    /// Disarm any pending auto-hide timer.
    CancelAutoHide,
}

/// Outcome of feeding one input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status_changed: bool,
    pub alert_changed: bool,
    /// Set when this input started a new incident.
    pub raised: Option<HealthReason>,
    pub effect: AlertEffect,
}

impl Transition {
    const UNCHANGED: Transition = Transition {
        status_changed: false,
        alert_changed: false,
        raised: None,
        effect: AlertEffect::None,
    };

    pub fn is_noop(&self) -> bool {
        *self == Self::UNCHANGED
    }
}

/// Merges connectivity and evaluator signals into status and alert state.
#[derive(Debug, Clone)]
pub struct HealthStateMachine {
    online: bool,
    signals: HealthSignals,
    status: HealthStatus,
    alert: AlertState,
    incident: Option<HealthReason>,
    auto_hide: Option<u64>,
    next_generation: u64,
}

impl HealthStateMachine {
    /// Start with good signals and no alert. Nothing is raised until the
    /// first input arrives.
    pub fn new(online: bool) -> Self {
        let signals = HealthSignals::default();
        Self {
            online,
            signals,
            status: HealthStatus::new(online, signals),
            alert: AlertState::default(),
            incident: None,
            auto_hide: None,
            next_generation: 0,
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn alert(&self) -> AlertState {
        self.alert
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Whether an auto-hide timer is armed.
    pub fn auto_hide_pending(&self) -> bool {
        self.auto_hide.is_some()
    }

    /// Feed a connectivity event together with a fresh evaluator tick, so
    /// both land in one recomputation. Repeating the current inputs is a no-op.
    pub fn set_inputs(&mut self, online: bool, signals: HealthSignals) -> Transition {
        let reconnected = !self.online && online;
        self.online = online;
        self.signals = signals;
        self.recompute(reconnected)
    }

    /// Feed the result of an evaluator tick.
    pub fn apply_signals(&mut self, signals: HealthSignals) -> Transition {
        self.signals = signals;
        self.recompute(false)
    }

    /// The auto-hide timer armed with `generation` fired. Returns whether the
    /// alert was hidden.
    pub fn auto_hide_elapsed(&mut self, generation: u64) -> bool {
        if self.auto_hide != Some(generation) {
            return false;
        }
        self.auto_hide = None;
        let was_visible = self.alert.visible;
        self.alert.visible = false;
        was_visible
    }

    /// User closed the alert. Suppressed until the next distinct incident.
    pub fn dismiss(&mut self) -> Transition {
        let before = self.alert;
        self.alert = AlertState {
            visible: false,
            dismissed_by_user: true,
        };
        let effect = match self.auto_hide.take() {
            Some(_) => AlertEffect::CancelAutoHide,
            None => AlertEffect::None,
        };
        Transition {
            status_changed: false,
            alert_changed: before != self.alert,
            raised: None,
            effect,
        }
    }

    fn recompute(&mut self, reconnected: bool) -> Transition {
        let before_status = self.status;
        let before_alert = self.alert;

        self.status = HealthStatus::new(self.online, self.signals);
        let reason = self.status.reason();

        let mut raised = None;
        let mut effect = AlertEffect::None;

        if reason.is_alerting() {
            if self.incident != Some(reason) {
                self.incident = Some(reason);
                self.alert = AlertState {
                    visible: true,
                    dismissed_by_user: false,
                };
                raised = Some(reason);
                if self.auto_hide.take().is_some() {
                    effect = AlertEffect::CancelAutoHide;
                }
            }
        } else {
            let cleared = self.incident.take();
            if reconnected {
                if self.alert.visible {
                    let generation = self.next_generation;
                    self.next_generation += 1;
                    self.auto_hide = Some(generation);
                    effect = AlertEffect::ScheduleAutoHide { generation };
                }
            } else if cleared.is_some() && self.auto_hide.is_none() {
                self.alert.visible = false;
            }
        }

        Transition {
            status_changed: before_status != self.status,
            alert_changed: before_alert != self.alert,
            raised,
            effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::types::{ConnectionQuality, SessionHealth};

    fn signals(quality: ConnectionQuality, session: SessionHealth) -> HealthSignals {
        HealthSignals {
            session_health: session,
            connection_quality: quality,
        }
    }

    fn good() -> HealthSignals {
        HealthSignals::default()
    }

    fn poor() -> HealthSignals {
        signals(ConnectionQuality::Poor, SessionHealth::Good)
    }

    impl HealthStateMachine {
        fn set_online(&mut self, online: bool) -> Transition {
            self.set_inputs(online, self.signals)
        }
    }

    fn started(online: bool, initial: HealthSignals) -> HealthStateMachine {
        let mut machine = HealthStateMachine::new(online);
        machine.apply_signals(initial);
        machine
    }

    #[test]
    fn test_healthy_start_has_no_alert() {
        let machine = started(true, good());
        assert_eq!(machine.status().reason(), HealthReason::Online);
        assert_eq!(machine.alert(), AlertState::default());
    }

    #[test]
    fn test_starting_offline_raises() {
        let machine = started(false, good());
        assert_eq!(machine.status().reason(), HealthReason::Offline);
        assert!(machine.alert().visible);
    }

    #[test]
    fn test_going_offline_raises_alert() {
        let mut machine = started(true, good());
        let t = machine.set_online(false);
        assert_eq!(t.raised, Some(HealthReason::Offline));
        assert!(t.status_changed && t.alert_changed);
        assert!(machine.alert().visible);
    }

    #[test]
    fn test_repeated_events_are_idempotent() {
        let mut machine = started(true, poor());
        assert!(machine.alert().visible);

        assert!(machine.apply_signals(poor()).is_noop());
        assert!(machine.set_online(true).is_noop());

        machine.set_online(false);
        assert!(machine.set_online(false).is_noop());
    }

    #[test]
    fn test_reconnect_schedules_auto_hide() {
        let mut machine = started(true, good());
        machine.set_online(false);

        let t = machine.set_online(true);
        let AlertEffect::ScheduleAutoHide { generation } = t.effect else {
            panic!("expected auto-hide, got {:?}", t.effect);
        };
        assert!(machine.alert().visible);
        assert_eq!(machine.status().reason(), HealthReason::Online);

        assert!(machine.auto_hide_elapsed(generation));
        assert!(!machine.alert().visible);
        assert!(!machine.auto_hide_pending());
    }

    #[test]
    fn test_new_incident_cancels_auto_hide() {
        let mut machine = started(true, good());
        machine.set_online(false);
        let AlertEffect::ScheduleAutoHide { generation } = machine.set_online(true).effect else {
            panic!("expected auto-hide");
        };

        let t = machine.apply_signals(poor());
        assert_eq!(t.raised, Some(HealthReason::PoorConnection));
        assert_eq!(t.effect, AlertEffect::CancelAutoHide);

        // A late firing of the superseded timer changes nothing.
        assert!(!machine.auto_hide_elapsed(generation));
        assert!(machine.alert().visible);
    }

    #[test]
    fn test_reconnect_into_degraded_state_raises_instead_of_hiding() {
        let mut machine = started(true, poor());
        machine.set_online(false);

        let t = machine.set_online(true);
        assert_eq!(t.raised, Some(HealthReason::PoorConnection));
        assert_eq!(t.effect, AlertEffect::None);
        assert!(machine.alert().visible);
    }

    #[test]
    fn test_reconnect_with_fresh_failures_raises_poor_connection() {
        let mut machine = started(true, good());
        machine.set_online(false);

        let t = machine.set_inputs(true, poor());
        assert_eq!(t.raised, Some(HealthReason::PoorConnection));
        assert_eq!(t.effect, AlertEffect::None);
        assert!(machine.alert().visible);
        assert!(!machine.auto_hide_pending());
    }

    #[test]
    fn test_offline_outranks_poor_quality() {
        let mut machine = started(true, poor());
        machine.set_online(false);
        assert_eq!(machine.status().reason(), HealthReason::Offline);
    }

    #[test]
    fn test_dismiss_is_per_incident() {
        let mut machine = started(true, good());
        machine.set_online(false);

        machine.dismiss();
        assert_eq!(
            machine.alert(),
            AlertState {
                visible: false,
                dismissed_by_user: true,
            }
        );

        // Same incident persisting stays suppressed.
        assert!(!machine.apply_signals(good()).alert_changed);
        assert!(!machine.alert().visible);

        // A distinct condition shows again.
        let t = machine.apply_signals(poor());
        assert_eq!(t.raised, None, "offline still outranks poor quality");
        machine.set_online(true);
        assert!(machine.alert().visible);
        assert!(!machine.alert().dismissed_by_user);
        assert_eq!(machine.status().reason(), HealthReason::PoorConnection);
    }

    #[test]
    fn test_dismiss_during_auto_hide_cancels_timer() {
        let mut machine = started(true, good());
        machine.set_online(false);
        machine.set_online(true);
        assert!(machine.auto_hide_pending());

        let t = machine.dismiss();
        assert_eq!(t.effect, AlertEffect::CancelAutoHide);
        assert!(!machine.auto_hide_pending());
    }

    #[test]
    fn test_dismissed_reconnect_does_not_schedule() {
        let mut machine = started(true, good());
        machine.set_online(false);
        machine.dismiss();

        let t = machine.set_online(true);
        assert_eq!(t.effect, AlertEffect::None);
        assert!(!machine.alert().visible);
    }

    #[test]
    fn test_recovery_without_reconnect_hides() {
        let mut machine = started(true, poor());
        assert!(machine.alert().visible);

        let t = machine.apply_signals(good());
        assert!(t.alert_changed);
        assert!(!machine.alert().visible);

        // Recurrence is a new incident.
        assert_eq!(machine.apply_signals(poor()).raised, Some(HealthReason::PoorConnection));
    }

    #[test]
    fn test_session_inactive_is_badge_only() {
        let mut machine = started(true, good());
        let t = machine.apply_signals(signals(ConnectionQuality::Good, SessionHealth::Warning));
        assert!(t.status_changed);
        assert!(!machine.alert().visible);
        assert_eq!(machine.status().reason(), HealthReason::SessionInactive);
    }

    #[test]
    fn test_escalation_to_new_reason_reraises() {
        let mut machine = started(true, signals(ConnectionQuality::Good, SessionHealth::Stale));
        machine.dismiss();

        let t = machine.apply_signals(signals(ConnectionQuality::Poor, SessionHealth::Stale));
        assert_eq!(t.raised, Some(HealthReason::PoorConnection));
        assert!(machine.alert().visible);
    }
}
