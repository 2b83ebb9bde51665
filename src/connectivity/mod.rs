//! Connectivity signal source.
//!
//! # Responsibilities
//! - Expose the host's current online/offline state
//! - Invoke subscribers once per host-reported transition
//!
//! # Design Decisions
//! - Purely event-driven; nothing here polls
//! - No de-duplication: identical repeated events reach subscribers and the
//!   state machine absorbs them
//! - Hosts without a connectivity API report `Unavailable` and the monitor
//!   falls back to assuming it is online

pub mod manual;

use std::fmt;

use thiserror::Error;

pub use manual::ManualConnectivity;

/// Callback invoked with the new `online` value.
pub type ConnectivityCallback = Box<dyn Fn(bool) + Send + Sync + 'static>;

/// Errors from subscribing to connectivity changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    /// The host has no connectivity change API.
    #[error("connectivity events are not available in this environment")]
    Unavailable,
}

/// Host environment's online/offline capability.
pub trait ConnectivityProvider: Send + Sync {
    /// Current reachability.
    fn current(&self) -> bool;

    /// Register `callback` for future transitions.
    fn on_change(&self, callback: ConnectivityCallback) -> Result<Subscription, ConnectivityError>;
}

/// Registration returned by `on_change`. Detaches the callback when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Detach the callback now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Provider for hosts with no connectivity API: always online, no events.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableConnectivity;

impl ConnectivityProvider for UnavailableConnectivity {
    fn current(&self) -> bool {
        true
    }

    fn on_change(&self, _callback: ConnectivityCallback) -> Result<Subscription, ConnectivityError> {
        Err(ConnectivityError::Unavailable)
    }
}
