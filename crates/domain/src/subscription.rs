//! Subscriptions a routine registers with the host.

use crate::id::EntityId;
use crate::state::StateChange;

/// Which reaction a matching change should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Goodnight,
    GoodMorning,
    NextWakeTime,
}

/// "Notify me when `entity_id` changes", optionally only for one target value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub entity_id: EntityId,
    pub new_state: Option<String>,
    pub reaction: Reaction,
}

impl Subscription {
    /// Subscribe to every change of `entity_id`.
    #[must_use]
    pub fn any(entity_id: EntityId, reaction: Reaction) -> Self {
        Self {
            entity_id,
            new_state: None,
            reaction,
        }
    }

    /// Subscribe to changes of `entity_id` into `new_state` only.
    #[must_use]
    pub fn to_state(entity_id: EntityId, new_state: impl Into<String>, reaction: Reaction) -> Self {
        Self {
            entity_id,
            new_state: Some(new_state.into()),
            reaction,
        }
    }

    /// Whether `change` should be delivered to this subscription.
    ///
    /// Notifications that repeat the previous value are not changes.
    #[must_use]
    pub fn matches(&self, change: &StateChange) -> bool {
        if change.entity_id != self.entity_id {
            return false;
        }
        if change.old.as_deref() == Some(change.new.as_str()) {
            return false;
        }
        self.new_state
            .as_deref()
            .is_none_or(|expected| expected == change.new)
    }
}
