//! Wake preparation scheduling.
//!
//! Tracks the two timers of a wake cycle and decides, for every wake-time
//! update, whether preparation must be scheduled, started right away, left
//! alone, or skipped because the window already passed.
//!
//! ```text
//! Idle ──[now < begins_at]──▶ PrepScheduled ──[prep timer fires]──▶ Preparing
//!  │                                                                  │
//!  └────────[begins_at <= now < wake_at]─────────────────────────────▶│
//!  ▲                                                                  │
//!  └────────────────────────[end timer fires, 300 s]──────────────────┘
//! ```
//!
//! Device commands are not issued here; the caller turns warm water on
//! before calling [`WakePreparation::begin`] and off after an accepted
//! [`TimerPurpose::PreparationEnd`].

use std::time::Duration;

use routines_domain::id::TimerHandle;
use routines_domain::time::Timestamp;
use routines_domain::timer::{FiredTimer, TimerPurpose};
use routines_domain::wake::{PREPARATION_DURATION, WakeTarget, WindowPosition};

use crate::ports::TimerScheduler;

/// Coarse view of the timers currently armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PrepScheduled,
    Preparing,
}

/// Decision taken for a wake-time update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeTimeOutcome {
    /// A fresh preparation timer was armed.
    Scheduled { handle: TimerHandle, delay: Duration },
    /// Inside the window with nothing running: begin preparation now.
    BeginNow,
    /// Inside the window but preparation is already running.
    AlreadyPreparing,
    /// The wake time is not in the future any more.
    WindowPassed,
    /// The offset pushes the window opening outside the representable date
    /// range. Nothing was cancelled or armed.
    OutOfRange,
}

/// Owns the preparation timers. At most one live handle per purpose.
#[derive(Debug)]
pub struct WakePreparation {
    offset_minutes: i64,
    prep_timer: Option<TimerHandle>,
    prep_end_timer: Option<TimerHandle>,
}

impl WakePreparation {
    /// Start idle, opening windows `offset_minutes` before each wake time.
    #[must_use]
    pub fn new(offset_minutes: i64) -> Self {
        Self {
            offset_minutes,
            prep_timer: None,
            prep_end_timer: None,
        }
    }

    /// Minutes between the window opening and the wake time.
    #[must_use]
    pub fn offset_minutes(&self) -> i64 {
        self.offset_minutes
    }

    /// Handle of the pending preparation-begin timer.
    #[must_use]
    pub fn prep_timer(&self) -> Option<TimerHandle> {
        self.prep_timer
    }

    /// Handle of the running preparation's end timer.
    #[must_use]
    pub fn prep_end_timer(&self) -> Option<TimerHandle> {
        self.prep_end_timer
    }

    /// Running preparation wins over a pending one for the next cycle.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match (self.prep_timer, self.prep_end_timer) {
            (_, Some(_)) => Phase::Preparing,
            (Some(_), None) => Phase::PrepScheduled,
            (None, None) => Phase::Idle,
        }
    }

    /// React to a new wake target.
    ///
    /// Any pending preparation timer is cancelled unconditionally, even if
    /// the new instant equals the old one. The only exception is
    /// [`WakeTimeOutcome::OutOfRange`], which leaves every timer untouched.
    pub fn reschedule<T: TimerScheduler>(
        &mut self,
        target: WakeTarget,
        now: Timestamp,
        timers: &T,
    ) -> WakeTimeOutcome {
        let Some(window) = target.preparation_window(self.offset_minutes) else {
            return WakeTimeOutcome::OutOfRange;
        };

        if let Some(previous) = self.prep_timer.take() {
            tracing::debug!(%previous, "cancelling previously scheduled prep timer");
            timers.cancel(previous);
        }

        match window.position(now) {
            WindowPosition::Upcoming { opens_in } => {
                let handle = timers.schedule_once(TimerPurpose::PreparationBegin, opens_in);
                self.prep_timer = Some(handle);
                WakeTimeOutcome::Scheduled {
                    handle,
                    delay: opens_in,
                }
            }
            WindowPosition::Open if self.prep_end_timer.is_some() => {
                WakeTimeOutcome::AlreadyPreparing
            }
            WindowPosition::Open => WakeTimeOutcome::BeginNow,
            WindowPosition::Passed => WakeTimeOutcome::WindowPassed,
        }
    }

    /// Enter the preparing phase: (re)arm the end timer for
    /// [`PREPARATION_DURATION`].
    pub fn begin<T: TimerScheduler>(&mut self, timers: &T) -> TimerHandle {
        self.prep_timer = None;
        if let Some(previous) = self.prep_end_timer.take() {
            tracing::debug!(%previous, "cancelling previous prep-end timer");
            timers.cancel(previous);
        }
        let handle = timers.schedule_once(TimerPurpose::PreparationEnd, PREPARATION_DURATION);
        self.prep_end_timer = Some(handle);
        handle
    }

    /// Consume a fired timer.
    ///
    /// Returns `false` (and changes nothing) when the handle is not the live
    /// one for its purpose, e.g. it was cancelled after it had already fired.
    pub fn accept_fired(&mut self, fired: FiredTimer) -> bool {
        let slot = match fired.purpose {
            TimerPurpose::PreparationBegin => &mut self.prep_timer,
            TimerPurpose::PreparationEnd => &mut self.prep_end_timer,
        };
        if *slot != Some(fired.handle) {
            return false;
        }
        *slot = None;
        true
    }
}
