//! Host-driven connectivity provider.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::connectivity::{ConnectivityCallback, ConnectivityError, ConnectivityProvider, Subscription};

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: BTreeMap<u64, Arc<ConnectivityCallback>>,
}

/// Connectivity whose value is pushed by the host via `set`.
///
/// Clones share state, so one clone can be handed to the monitor while the
/// host keeps another to report transitions.
#[derive(Clone)]
pub struct ManualConnectivity {
    online: Arc<AtomicBool>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Report a host event. Every live subscriber is called once, in
    /// registration order, on the calling thread.
    pub fn set(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        // Snapshot so callbacks can (un)subscribe without deadlocking.
        let callbacks: Vec<_> = self.lock().callbacks.values().cloned().collect();
        for callback in callbacks {
            (**callback)(online);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock().callbacks.len()
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityProvider for ManualConnectivity {
    fn current(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn on_change(&self, callback: ConnectivityCallback) -> Result<Subscription, ConnectivityError> {
        let id = {
            let mut subs = self.lock();
            let id = subs.next_id;
            subs.next_id += 1;
            subs.callbacks.insert(id, Arc::new(callback));
            id
        };

        let subscribers = Arc::downgrade(&self.subscribers);
        Ok(Subscription::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                let removed = subscribers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .callbacks
                    .remove(&id);
                drop(removed);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::UnavailableConnectivity;

    #[test]
    fn test_set_notifies_every_event() {
        let conn = ManualConnectivity::new(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = conn
            .on_change(Box::new(move |online| s.lock().unwrap().push(online)))
            .unwrap();

        conn.set(false);
        conn.set(false);
        conn.set(true);

        assert_eq!(*seen.lock().unwrap(), vec![false, false, true]);
        assert!(conn.current());
    }

    #[test]
    fn test_unsubscribe_detaches() {
        let conn = ManualConnectivity::new(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let sub = conn
            .on_change(Box::new(move |online| s.lock().unwrap().push(online)))
            .unwrap();
        assert_eq!(conn.subscriber_count(), 1);

        sub.unsubscribe();
        conn.set(false);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(conn.subscriber_count(), 0);
    }

    #[test]
    fn test_unavailable_reports_online() {
        let conn = UnavailableConnectivity;
        assert!(conn.current());
        assert_eq!(
            conn.on_change(Box::new(|_| {})).unwrap_err(),
            ConnectivityError::Unavailable
        );
    }
}
