//! Tokio-backed scheduler.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{MonitorError, MonitorResult};
use crate::scheduler::{CancelToken, OnceTask, RepeatingTask, Scheduler};

/// Spawns timers as Tokio tasks; cancelling a token aborts its task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Schedule onto the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Schedule onto the runtime the caller is running in.
    pub fn current() -> MonitorResult<Self> {
        let handle = Handle::try_current().map_err(|e| MonitorError::NoRuntime(e.to_string()))?;
        Ok(Self::new(handle))
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: OnceTask) -> CancelToken {
        let join = self.handle.spawn(async move {
            time::sleep(delay).await;
            task();
        });
        CancelToken::new(move || join.abort())
    }

    fn every(&self, period: Duration, mut task: RepeatingTask) -> CancelToken {
        let join = self.handle.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task();
            }
        });
        CancelToken::new(move || join.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicU32>, impl Fn() -> u32) {
        let count = Arc::new(AtomicU32::new(0));
        let read = count.clone();
        (count, move || read.load(Ordering::SeqCst))
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_fires_once() {
        let scheduler = TokioScheduler::current().unwrap();
        let (count, read) = counter();
        let _token = scheduler.after(
            Duration::from_millis(3000),
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );

        time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(read(), 0);
        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(read(), 1);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(read(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_skips_immediate_tick() {
        let scheduler = TokioScheduler::current().unwrap();
        let (count, read) = counter();
        let _token = scheduler.every(
            Duration::from_secs(30),
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::task::yield_now().await;
        assert_eq!(read(), 0);
        time::sleep(Duration::from_millis(30_001)).await;
        assert_eq!(read(), 1);
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(read(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_firings() {
        let scheduler = TokioScheduler::current().unwrap();
        let (count, read) = counter();
        let token = scheduler.every(
            Duration::from_secs(1),
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );

        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(read(), 1);
        token.cancel();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(read(), 1);
    }

    #[test]
    fn test_current_outside_runtime_fails() {
        assert!(matches!(TokioScheduler::current(), Err(MonitorError::NoRuntime(_))));
    }
}
