//! Observed host state: change notifications and the sleep/awake values.

use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// A change notification for one host entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub entity_id: EntityId,
    /// Previous value, absent when the entity has just appeared.
    #[serde(default)]
    pub old: Option<String>,
    pub new: String,
}

impl StateChange {
    /// Build a change notification.
    #[must_use]
    pub fn new(entity_id: EntityId, old: Option<&str>, new: impl Into<String>) -> Self {
        Self {
            entity_id,
            old: old.map(str::to_string),
            new: new.into(),
        }
    }
}

/// Value of the sleep/awake entity once the user has gone to bed.
pub const SLEEP: &str = "sleep";
/// Value of the sleep/awake entity once the user is up.
pub const AWAKE: &str = "awake";
