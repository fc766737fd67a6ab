//! Timer purposes and fired-timer notifications.

use serde::{Deserialize, Serialize};

use crate::id::TimerHandle;

/// What an armed timer is for. At most one live timer exists per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPurpose {
    PreparationBegin,
    PreparationEnd,
}

/// Delivered by the host when a one-shot timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub purpose: TimerPurpose,
}
