//! Virtual-time scheduler.
//!
//! Time only moves when `advance` is called, which makes timer-driven
//! behaviour reproducible in tests and in hosts that own their own loop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::scheduler::{CancelToken, OnceTask, RepeatingTask, Scheduler};
use crate::time::{Clock, Timestamp};

enum Task {
    Once(OnceTask),
    Every { period: Duration, task: RepeatingTask },
}

struct Timer {
    deadline: Duration,
    seq: u64,
    /// `None` while the callback is running.
    task: Option<Task>,
}

#[derive(Default)]
struct ManualState {
    elapsed: Duration,
    next_seq: u64,
    timers: HashMap<u64, Timer>,
}

impl ManualState {
    fn insert(&mut self, deadline: Duration, task: Task) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(
            seq,
            Timer {
                deadline,
                seq,
                task: Some(task),
            },
        );
        seq
    }

    /// Earliest runnable timer due at or before `target`, FIFO among ties.
    fn next_due(&self, target: Duration) -> Option<u64> {
        self.timers
            .iter()
            .filter(|(_, t)| t.task.is_some() && t.deadline <= target)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(id, _)| *id)
    }
}

/// Scheduler and clock driven by explicit `advance` calls.
#[derive(Clone)]
pub struct ManualScheduler {
    start: Timestamp,
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    /// Create a scheduler whose clock reads `start` until advanced.
    pub fn new(start: Timestamp) -> Self {
        Self {
            start,
            state: Arc::new(Mutex::new(ManualState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of live timers (one-shot not yet fired, plus repeating).
    pub fn pending(&self) -> usize {
        self.lock().timers.len()
    }

    /// Move virtual time forward by `by`, firing every timer that falls due.
    ///
    /// Callbacks run without the scheduler lock held and may register or
    /// cancel timers; ones registered inside the window fire in the same call.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().elapsed.saturating_add(by);

        loop {
            let (id, task) = {
                let mut state = self.lock();
                let Some(id) = state.next_due(target) else {
                    state.elapsed = target;
                    return;
                };
                let Some(timer) = state.timers.get_mut(&id) else {
                    continue;
                };
                let deadline = timer.deadline;
                let task = timer.task.take();
                state.elapsed = state.elapsed.max(deadline);
                (id, task)
            };

            match task {
                Some(Task::Once(task)) => {
                    let removed = self.lock().timers.remove(&id);
                    drop(removed);
                    task();
                }
                Some(Task::Every { period, mut task }) => {
                    task();
                    let mut state = self.lock();
                    let seq = state.next_seq;
                    let still_live = match state.timers.get_mut(&id) {
                        Some(timer) => {
                            timer.deadline += period;
                            timer.seq = seq;
                            timer.task = Some(Task::Every { period, task });
                            true
                        }
                        None => false,
                    };
                    if still_live {
                        state.next_seq += 1;
                    }
                }
                None => {}
            }
        }
    }

    fn register(&self, delay: Duration, task: Task) -> CancelToken {
        let id = {
            let mut state = self.lock();
            let deadline = state.elapsed.saturating_add(delay);
            state.insert(deadline, task)
        };

        let state = Arc::downgrade(&self.state);
        CancelToken::new(move || {
            if let Some(state) = state.upgrade() {
                let removed = state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .timers
                    .remove(&id);
                drop(removed);
            }
        })
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: OnceTask) -> CancelToken {
        self.register(delay, Task::Once(task))
    }

    fn every(&self, period: Duration, task: RepeatingTask) -> CancelToken {
        // A zero period would never let virtual time move past the deadline.
        let period = period.max(Duration::from_millis(1));
        self.register(period, Task::Every { period, task })
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> Timestamp {
        self.start.saturating_add(self.elapsed())
    }
}
