//! Shared harness for monitor integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use health_monitor::config::MonitorConfig;
use health_monitor::connectivity::ManualConnectivity;
use health_monitor::ledger::{MemoryStore, StoreLedger, GLOBAL_ERRORS_KEY, LAST_API_CALL_KEY};
use health_monitor::scheduler::ManualScheduler;
use health_monitor::time::{Clock, Timestamp};
use health_monitor::{HealthMonitor, MonitorCapabilities};

/// 2023-11-14T22:13:20Z
pub const START: Timestamp = Timestamp(1_700_000_000_000);

pub const MINUTE: Duration = Duration::from_secs(60);

/// Virtual-time world a monitor runs in.
pub struct Harness {
    pub scheduler: Arc<ManualScheduler>,
    pub store: MemoryStore,
    pub connectivity: ManualConnectivity,
    pub config: MonitorConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            scheduler: Arc::new(ManualScheduler::new(START)),
            store: MemoryStore::new(),
            connectivity: ManualConnectivity::new(true),
            config: MonitorConfig::default(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.scheduler.now()
    }

    /// Record the last successful API call `ago` before virtual now.
    pub fn last_call_ago(&self, ago: Duration) {
        let at = self.now().saturating_sub(ago);
        self.store.set(LAST_API_CALL_KEY, at.as_millis().to_string());
    }

    /// Record `count` API failures spread over the `within` before virtual now.
    pub fn errors_within(&self, count: u32, within: Duration) {
        let now = self.now();
        let step = within / count.max(1);
        let events: Vec<_> = (0..count)
            .map(|i| serde_json::json!({ "occurredAt": now.saturating_sub(step * i).as_millis() }))
            .collect();
        self.store.set(GLOBAL_ERRORS_KEY, serde_json::Value::Array(events).to_string());
    }

    pub fn clear_errors(&self) {
        self.store.remove(GLOBAL_ERRORS_KEY);
    }

    pub fn advance(&self, by: Duration) {
        self.scheduler.advance(by);
    }

    pub fn start(&self) -> HealthMonitor {
        HealthMonitor::start(
            &self.config,
            MonitorCapabilities {
                ledger: Arc::new(StoreLedger::new(self.store.clone())),
                connectivity: Arc::new(self.connectivity.clone()),
                scheduler: self.scheduler.clone(),
                clock: self.scheduler.clone(),
            },
        )
    }
}
