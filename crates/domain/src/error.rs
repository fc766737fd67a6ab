//! Error types shared across the workspace.
//!
//! Each concern owns a typed error. [`RoutinesError`] is what a dispatcher
//! reports back; configuration and wake-time errors stay separate because
//! they are handled at different points.

use crate::action::ExtensionAction;
use crate::id::EntityId;

/// Error reported back by an action dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum RoutinesError {
    #[error("action not supported")]
    Unsupported(#[from] UnsupportedActionError),

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}

/// Invalid or missing routine configuration. Always fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required app argument '{key}'")]
    MissingArgument { key: &'static str },

    #[error("invalid integer for app argument '{key}': {value}")]
    InvalidInteger { key: &'static str, value: String },

    #[error("app argument '{key}' must be {expected}")]
    InvalidType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("entity id must not be empty")]
    EmptyEntityId,
}

/// A wake-time string that none of the accepted shapes could parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WakeTimeParseError {
    #[error("unrecognised datetime format: {input}")]
    Unrecognised { input: String },

    #[error("local time {input} does not exist in the local timezone")]
    NonexistentLocalTime { input: String },
}

/// An extension action the dispatcher does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{action} is not supported yet")]
pub struct UnsupportedActionError {
    pub action: ExtensionAction,
}
