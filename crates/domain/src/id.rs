//! Identifier newtypes.
//!
//! Host entities are addressed by the host's own string identifiers
//! (`scene.lights_off`, `switch.warm_water`); timer handles are opaque
//! UUIDs minted by whoever implements the scheduler port.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier of an entity tracked by the host (scene, switch, input, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Build an identifier, rejecting empty or whitespace-only values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyEntityId`] when `value` is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyEntityId);
        }
        if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// The raw host identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Cancellable handle of a one-shot delayed callback.
    TimerHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_host_identifier_verbatim() {
        let id = EntityId::new("scene.lights_off").unwrap();
        assert_eq!(id.as_str(), "scene.lights_off");
        assert_eq!(id.to_string(), "scene.lights_off");
    }

    #[test]
    fn should_trim_surrounding_whitespace() {
        let id = EntityId::new("  switch.warm_water ").unwrap();
        assert_eq!(id.as_str(), "switch.warm_water");
    }

    #[test]
    fn should_reject_blank_entity_id() {
        assert!(matches!(EntityId::new("   "), Err(ConfigError::EmptyEntityId)));
    }

    #[test]
    fn should_reject_blank_entity_id_from_json() {
        let result: Result<EntityId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn should_generate_unique_timer_handles() {
        assert_ne!(TimerHandle::new(), TimerHandle::new());
    }
}
