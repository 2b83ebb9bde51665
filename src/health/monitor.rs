//! Health monitor: wires signals, evaluator, state machine and timers.
//!
//! # Responsibilities
//! - Subscribe to connectivity changes and re-read the ledger on every event
//! - Evaluate once at start, then on the poll interval
//! - Arm and disarm the alert auto-hide timer
//! - Publish a snapshot on every change for the rendering layer
//! - Release every timer and subscription on shutdown
//!
//! # Design Decisions
//! - One mutex serializes connectivity events, poll ticks and timer firings;
//!   ledger reads happen under it so the latest writer sees current inputs
//! - Callbacks hold a `Weak` to the core, so pending timers never keep a
//!   stopped monitor alive

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use crate::config::MonitorConfig;
use crate::connectivity::{ConnectivityError, ConnectivityProvider, Subscription};
use crate::health::evaluator::HealthEvaluator;
use crate::health::presenter::{present_reason, StatusColor};
use crate::health::state::{AlertEffect, HealthStateMachine, Transition};
use crate::health::types::{AlertState, HealthStatus};
use crate::ledger::ActivityLedger;
use crate::observability::metrics;
use crate::scheduler::{CancelToken, RepeatingTask, Scheduler};
use crate::time::Clock;

/// Read-only view handed to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub color: StatusColor,
    pub label: &'static str,
    pub message: Option<&'static str>,
    pub alert_visible: bool,
}

impl HealthSnapshot {
    fn of(machine: &HealthStateMachine) -> Self {
        let presentation = present_reason(machine.status().reason());
        Self {
            color: presentation.color,
            label: presentation.label,
            message: presentation.message,
            alert_visible: machine.alert().visible,
        }
    }
}

/// Injected host capabilities.
#[derive(Clone)]
pub struct MonitorCapabilities {
    pub ledger: Arc<dyn ActivityLedger>,
    pub connectivity: Arc<dyn ConnectivityProvider>,
    pub scheduler: Arc<dyn Scheduler>,
    pub clock: Arc<dyn Clock>,
}

struct MonitorState {
    machine: HealthStateMachine,
    auto_hide_timer: Option<CancelToken>,
    publisher: watch::Sender<HealthSnapshot>,
    stopped: bool,
}

struct MonitorCore {
    state: Mutex<MonitorState>,
    evaluator: HealthEvaluator,
    scheduler: Arc<dyn Scheduler>,
    auto_hide_delay: Duration,
}

impl MonitorCore {
    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_connectivity(self: &Arc<Self>, online: bool) {
        let mut state = self.lock();
        if state.stopped {
            return;
        }
        if state.machine.is_online() != online {
            tracing::info!(online, "Connectivity changed");
            metrics::record_connectivity_change(online);
        }
        let signals = self.evaluator.evaluate();
        metrics::record_evaluation();
        let transition = state.machine.set_inputs(online, signals);
        if transition.is_noop() {
            return;
        }
        self.apply(&mut state, transition);
    }

    fn on_poll(self: &Arc<Self>) {
        let mut state = self.lock();
        if state.stopped {
            return;
        }
        let signals = self.evaluator.evaluate();
        metrics::record_evaluation();
        let transition = state.machine.apply_signals(signals);
        self.apply(&mut state, transition);
    }

    fn on_auto_hide(&self, generation: u64) {
        let mut state = self.lock();
        if state.stopped {
            return;
        }
        if state.machine.auto_hide_elapsed(generation) {
            tracing::debug!("Health alert auto-hidden");
            publish(&state);
        }
        // A stale firing must not release the token of a newer timer.
        let released = if state.machine.auto_hide_pending() {
            None
        } else {
            state.auto_hide_timer.take()
        };
        drop(state);
        drop(released);
    }

    fn dismiss(self: &Arc<Self>) {
        let mut state = self.lock();
        if state.stopped {
            return;
        }
        let transition = state.machine.dismiss();
        tracing::info!(reason = %state.machine.status().reason(), "Health alert dismissed");
        self.apply(&mut state, transition);
    }

    fn apply(self: &Arc<Self>, state: &mut MonitorState, transition: Transition) {
        match transition.effect {
            AlertEffect::ScheduleAutoHide { generation } => {
                let core = Arc::downgrade(self);
                let token = self.scheduler.after(
                    self.auto_hide_delay,
                    Box::new(move || {
                        if let Some(core) = core.upgrade() {
                            core.on_auto_hide(generation);
                        }
                    }),
                );
                state.auto_hide_timer = Some(token);
            }
            AlertEffect::CancelAutoHide => {
                state.auto_hide_timer = None;
            }
            AlertEffect::None => {}
        }

        let reason = state.machine.status().reason();
        if let Some(raised) = transition.raised {
            tracing::info!(reason = %raised, "Health alert raised");
            metrics::record_alert_shown(raised);
        }
        if transition.status_changed {
            tracing::debug!(reason = %reason, "Health status changed");
            metrics::record_health_status(reason);
        }
        if transition.status_changed || transition.alert_changed {
            publish(state);
        }
    }
}

fn publish(state: &MonitorState) {
    let snapshot = HealthSnapshot::of(&state.machine);
    state.publisher.send_if_modified(|current| {
        if *current == snapshot {
            false
        } else {
            *current = snapshot;
            true
        }
    });
}

/// Running connectivity and session health monitor.
///
/// Dropping the monitor has the same effect as `shutdown`.
pub struct HealthMonitor {
    core: Arc<MonitorCore>,
    poll_timer: Option<CancelToken>,
    connectivity: Option<Subscription>,
}

impl HealthMonitor {
    /// Subscribe to connectivity, run the first evaluation immediately and
    /// start the poll timer.
    pub fn start(config: &MonitorConfig, capabilities: MonitorCapabilities) -> Self {
        let MonitorCapabilities {
            ledger,
            connectivity,
            scheduler,
            clock,
        } = capabilities;

        let machine = HealthStateMachine::new(connectivity.current());
        let (publisher, _) = watch::channel(HealthSnapshot::of(&machine));

        let core = Arc::new(MonitorCore {
            state: Mutex::new(MonitorState {
                machine,
                auto_hide_timer: None,
                publisher,
                stopped: false,
            }),
            evaluator: HealthEvaluator::new(ledger, clock, config.thresholds.clone()),
            scheduler: scheduler.clone(),
            auto_hide_delay: config.timing.auto_hide(),
        });

        let weak = Arc::downgrade(&core);
        let subscription = match connectivity.on_change(Box::new(move |online| {
            if let Some(core) = weak.upgrade() {
                core.on_connectivity(online);
            }
        })) {
            Ok(subscription) => Some(subscription),
            Err(ConnectivityError::Unavailable) => {
                tracing::info!("Connectivity events unavailable, assuming online");
                core.lock().machine = HealthStateMachine::new(true);
                None
            }
        };

        core.on_poll();

        let poll_timer = scheduler.every(config.timing.poll_interval(), poll_task(Arc::downgrade(&core)));

        tracing::info!(
            poll_interval_ms = config.timing.poll_interval_ms,
            auto_hide_ms = config.timing.auto_hide_ms,
            connectivity_events = subscription.is_some(),
            "Health monitor started"
        );

        Self {
            core,
            poll_timer: Some(poll_timer),
            connectivity: subscription,
        }
    }

    /// Current display state.
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot::of(&self.core.lock().machine)
    }

    pub fn status(&self) -> HealthStatus {
        self.core.lock().machine.status()
    }

    pub fn alert(&self) -> AlertState {
        self.core.lock().machine.alert()
    }

    /// Watch channel receiving a new snapshot on every change.
    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.core.lock().publisher.subscribe()
    }

    /// Hide the alert until the next distinct incident.
    pub fn dismiss(&self) {
        self.core.dismiss();
    }

    /// Evaluate off-cycle, without disturbing the poll cadence.
    pub fn evaluate_now(&self) {
        self.core.on_poll();
    }

    /// Stop all timers and detach from connectivity events.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let subscription = self.connectivity.take();
        let poll_timer = self.poll_timer.take();
        drop(subscription);
        drop(poll_timer);

        let auto_hide = {
            let mut state = self.core.lock();
            if state.stopped {
                return;
            }
            state.stopped = true;
            state.auto_hide_timer.take()
        };
        drop(auto_hide);

        tracing::info!("Health monitor stopped");
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_task(core: Weak<MonitorCore>) -> RepeatingTask {
    Box::new(move || {
        if let Some(core) = core.upgrade() {
            core.on_poll();
        }
    })
}
