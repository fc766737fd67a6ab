//! Device actions performed by the routines.
//!
//! Every helper is a single fire-and-forget dispatcher call. Failures are
//! logged and swallowed so a flaky device never aborts a reaction halfway.

use routines_domain::action::ExtensionAction;
use routines_domain::error::RoutinesError;
use routines_domain::id::EntityId;

use crate::config::RoutineConfig;
use crate::ports::ActionDispatcher;

/// Binds a dispatcher to the configured scenes and devices.
pub struct RoutineActions<D> {
    dispatcher: D,
    turn_off_lights_scene: EntityId,
    goodmorning_lights_scene: Option<EntityId>,
    warm_water: EntityId,
}

impl<D: ActionDispatcher> RoutineActions<D> {
    /// Bind `dispatcher` to the entities named in `config`.
    pub fn new(dispatcher: D, config: &RoutineConfig) -> Self {
        Self {
            dispatcher,
            turn_off_lights_scene: config.turn_off_lights_scene.clone(),
            goodmorning_lights_scene: config.goodmorning_lights_scene.clone(),
            warm_water: config.warm_water.clone(),
        }
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Activate the lights-off scene.
    pub async fn activate_turn_off_lights_scene(&self) {
        self.turn_on(&self.turn_off_lights_scene).await;
    }

    /// Activate the good-morning scene. Returns `false` when none is configured.
    pub async fn activate_goodmorning_lights_scene(&self) -> bool {
        let Some(scene) = &self.goodmorning_lights_scene else {
            tracing::warn!("no goodmorning_lights_scene configured");
            return false;
        };
        self.turn_on(scene).await;
        true
    }

    /// Switch the warm-water device on or off.
    pub async fn turn_warm_water(&self, on: bool) {
        if on {
            self.turn_on(&self.warm_water).await;
        } else {
            self.turn_off(&self.warm_water).await;
        }
    }

    /// Run an optional capability.
    ///
    /// # Errors
    ///
    /// Returns [`RoutinesError::Unsupported`] when the dispatcher does not
    /// implement `action`, or whatever error the dispatcher reports.
    pub async fn perform(&self, action: ExtensionAction) -> Result<(), RoutinesError> {
        self.dispatcher.perform_extension(action).await
    }

    async fn turn_on(&self, target: &EntityId) {
        tracing::debug!(%target, "turn_on");
        if let Err(error) = self.dispatcher.turn_on(target).await {
            tracing::error!(%target, error = %error, "turn_on failed");
        }
    }

    async fn turn_off(&self, target: &EntityId) {
        tracing::debug!(%target, "turn_off");
        if let Err(error) = self.dispatcher.turn_off(target).await {
            tracing::error!(%target, error = %error, "turn_off failed");
        }
    }
}
