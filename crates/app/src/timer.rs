//! In-process timers backed by the tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::TimeDelta;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use routines_domain::id::TimerHandle;
use routines_domain::time::Timestamp;
use routines_domain::timer::{FiredTimer, TimerPurpose};

use crate::ports::{Clock, TimerScheduler};

type PendingTimers = Arc<Mutex<HashMap<TimerHandle, AbortHandle>>>;

/// [`TimerScheduler`] spawning one sleeping task per armed timer.
///
/// Fired timers are delivered on the receiver returned by [`new`](Self::new).
/// Must be used from within a tokio runtime.
pub struct TokioTimerScheduler {
    sender: mpsc::UnboundedSender<FiredTimer>,
    pending: PendingTimers,
}

impl TokioTimerScheduler {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FiredTimer>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            sender,
            pending: Arc::default(),
        };
        (scheduler, receiver)
    }

    /// Number of armed timers that have neither fired nor been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

fn lock(pending: &PendingTimers) -> MutexGuard<'_, HashMap<TimerHandle, AbortHandle>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TimerScheduler for TokioTimerScheduler {
    fn schedule_once(&self, purpose: TimerPurpose, delay: Duration) -> TimerHandle {
        let handle = TimerHandle::new();
        let sender = self.sender.clone();
        let pending = Arc::clone(&self.pending);

        // Hold the lock while spawning so a zero delay cannot fire (and
        // remove itself) before the abort handle is registered.
        let mut guard = lock(&self.pending);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&pending).remove(&handle);
            // The receiver is gone only during shutdown.
            let _ = sender.send(FiredTimer { handle, purpose });
        });
        guard.insert(handle, task.abort_handle());
        drop(guard);

        tracing::debug!(%handle, ?purpose, seconds = delay.as_secs(), "timer armed");
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = lock(&self.pending).remove(&handle) {
            task.abort();
            tracing::debug!(%handle, "timer cancelled");
        }
    }
}

impl Drop for TokioTimerScheduler {
    fn drop(&mut self) {
        for (_, task) in lock(&self.pending).drain() {
            task.abort();
        }
    }
}

/// [`Clock`] that advances with tokio's time source.
///
/// Anchored to a UTC origin at construction; under a paused runtime it
/// follows `tokio::time::advance` instead of the wall clock.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Timestamp,
    started: tokio::time::Instant,
}

impl TokioClock {
    #[must_use]
    pub fn starting_at(origin: Timestamp) -> Self {
        Self {
            origin,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        TimeDelta::from_std(self.started.elapsed())
            .map_or(self.origin, |elapsed| self.origin + elapsed)
    }
}
