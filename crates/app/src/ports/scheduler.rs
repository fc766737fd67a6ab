//! Scheduler port — one-shot delayed callbacks.

use std::time::Duration;

use routines_domain::id::TimerHandle;
use routines_domain::timer::TimerPurpose;

/// Arms and cancels one-shot timers.
///
/// When a timer elapses the host delivers a
/// [`FiredTimer`](routines_domain::timer::FiredTimer) carrying the handle and
/// purpose back to the routine.
pub trait TimerScheduler {
    /// Arm a timer firing once after `delay`.
    fn schedule_once(&self, purpose: TimerPurpose, delay: Duration) -> TimerHandle;

    /// Cancel a timer. Unknown or already-fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

impl<T: TimerScheduler> TimerScheduler for std::sync::Arc<T> {
    fn schedule_once(&self, purpose: TimerPurpose, delay: Duration) -> TimerHandle {
        (**self).schedule_once(purpose, delay)
    }

    fn cancel(&self, handle: TimerHandle) {
        (**self).cancel(handle);
    }
}
