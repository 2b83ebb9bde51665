//! Timer capability.
//!
//! # Data Flow
//! ```text
//! HealthMonitor
//!     → every(poll_interval)  → evaluation tick
//!     → after(auto_hide)      → alert auto-hide
//!     ← CancelToken (released on shutdown / drop)
//! ```
//!
//! # Design Decisions
//! - Timers are injected so tests advance virtual time (`ManualScheduler`)
//!   while production spawns onto Tokio (`TokioScheduler`)
//! - Every registration returns a `CancelToken`; dropping it stops future firings
//! - `every` fires first one period after registration, never immediately

pub mod manual;
pub mod runtime;

use std::fmt;
use std::time::Duration;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// One-shot timer callback.
pub type OnceTask = Box<dyn FnOnce() + Send + 'static>;

/// Repeating timer callback.
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Schedules callbacks on some notion of time.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`.
    fn after(&self, delay: Duration, task: OnceTask) -> CancelToken;

    /// Run `task` every `period`, starting one period from now.
    fn every(&self, period: Duration, task: RepeatingTask) -> CancelToken;
}

/// Handle to a scheduled timer.
///
/// Cancels the timer when dropped. Cancelling more than once is a no-op.
#[must_use = "dropping a CancelToken cancels its timer"]
pub struct CancelToken {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl CancelToken {
    /// Build a token that runs `cancel` on release.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop future firings of the timer.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for CancelToken {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_token_releases_once() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        let token = CancelToken::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        token.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_token_releases_on_drop() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        {
            let _token = CancelToken::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
