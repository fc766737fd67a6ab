//! Wake target and the preparation window derived from it.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::error::WakeTimeParseError;
use crate::time::{LocalZone, parse_wake_time};

/// How long preparation stays active once it has begun.
pub const PREPARATION_DURATION: Duration = Duration::from_secs(5 * 60);

/// The next scheduled wake-up, replaced wholesale on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeTarget(DateTime<FixedOffset>);

impl WakeTarget {
    #[must_use]
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    /// Parse a host-supplied wake time; see [`parse_wake_time`].
    ///
    /// # Errors
    ///
    /// Propagates the [`WakeTimeParseError`] of the parser.
    pub fn parse(value: &str, zone: LocalZone) -> Result<Self, WakeTimeParseError> {
        parse_wake_time(value, zone).map(Self)
    }

    #[must_use]
    pub fn at(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// The window that opens `offset_minutes` before this wake-up.
    ///
    /// Returns `None` when the opening instant falls outside the
    /// representable date range.
    #[must_use]
    pub fn preparation_window(&self, offset_minutes: i64) -> Option<PreparationWindow> {
        let offset = TimeDelta::try_minutes(offset_minutes)?;
        Some(PreparationWindow {
            begins_at: self.0.checked_sub_signed(offset)?,
            wake_at: self.0,
        })
    }
}

/// Where "now" sits relative to a [`PreparationWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// The window opens in the given (truncated to whole seconds) delay.
    Upcoming { opens_in: Duration },
    Open,
    Passed,
}

/// Interval `[begins_at, wake_at)` in which preparation should be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparationWindow {
    pub begins_at: DateTime<FixedOffset>,
    pub wake_at: DateTime<FixedOffset>,
}

impl PreparationWindow {
    #[must_use]
    pub fn position(&self, now: DateTime<Utc>) -> WindowPosition {
        if now < self.begins_at {
            let whole_seconds = (self.begins_at.with_timezone(&Utc) - now).num_seconds();
            WindowPosition::Upcoming {
                opens_in: Duration::from_secs(whole_seconds.unsigned_abs()),
            }
        } else if now < self.wake_at {
            WindowPosition::Open
        } else {
            WindowPosition::Passed
        }
    }
}
