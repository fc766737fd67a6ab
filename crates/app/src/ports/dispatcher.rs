//! Action dispatcher port — commands sent to host devices and scenes.

use std::future::Future;

use routines_domain::action::ExtensionAction;
use routines_domain::error::{RoutinesError, UnsupportedActionError};
use routines_domain::id::EntityId;

/// Fire-and-forget device commands.
///
/// Implementations must not retry or wait for confirmation; a returned error
/// only means the command could not be handed to the host.
pub trait ActionDispatcher {
    /// Turn on a device, or activate a scene.
    fn turn_on(&self, target: &EntityId) -> impl Future<Output = Result<(), RoutinesError>> + Send;

    /// Turn off a device.
    fn turn_off(&self, target: &EntityId)
    -> impl Future<Output = Result<(), RoutinesError>> + Send;

    /// Perform an optional capability (blinds, fans, confirmation, …).
    ///
    /// The default implementation supports nothing.
    fn perform_extension(
        &self,
        action: ExtensionAction,
    ) -> impl Future<Output = Result<(), RoutinesError>> + Send {
        async move { Err(UnsupportedActionError { action }.into()) }
    }
}

impl<T: ActionDispatcher + Send + Sync> ActionDispatcher for std::sync::Arc<T> {
    fn turn_on(&self, target: &EntityId) -> impl Future<Output = Result<(), RoutinesError>> + Send {
        (**self).turn_on(target)
    }

    fn turn_off(&self, target: &EntityId)
    -> impl Future<Output = Result<(), RoutinesError>> + Send {
        (**self).turn_off(target)
    }

    fn perform_extension(
        &self,
        action: ExtensionAction,
    ) -> impl Future<Output = Result<(), RoutinesError>> + Send {
        (**self).perform_extension(action)
    }
}
