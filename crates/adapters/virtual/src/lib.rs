//! # routines-adapter-virtual
//!
//! Virtual/demo dispatcher that stands in for the home-automation host's
//! device layer, for testing and demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Registered from | Behaviour |
//! |--------|-----------------|-----------|
//! | Virtual Scene | `turn_off_lights_scene`, `goodmorning_lights_scene` | Counts `turn_on` activations |
//! | Virtual Switch | `ww_activate` | Holds on/off state |
//!
//! Every command, including those to unknown entities, is appended to a
//! history for inspection.
//!
//! ## Dependency rule
//!
//! Depends on `routines-app` (port traits) and `routines-domain` only.

mod devices;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use routines_app::config::RoutineConfig;
use routines_app::ports::ActionDispatcher;
use routines_domain::error::RoutinesError;
use routines_domain::id::EntityId;

use devices::{VirtualDevice, VirtualScene, VirtualSwitch};

/// Command sent to a virtual device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    TurnOn,
    TurnOff,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnOn => f.write_str("turn_on"),
            Self::TurnOff => f.write_str("turn_off"),
        }
    }
}

/// One dispatched command, as recorded in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub target: EntityId,
    pub service: Service,
}

/// Simulated home holding the scenes and switches a routine talks to.
#[derive(Default)]
pub struct VirtualHome {
    devices: HashMap<EntityId, VirtualDevice>,
    history: Mutex<Vec<Command>>,
}

impl VirtualHome {
    /// Register every scene and device named in `config`.
    #[must_use]
    pub fn for_config(config: &RoutineConfig) -> Self {
        let mut home = Self::default()
            .with_scene(config.turn_off_lights_scene.clone())
            .with_switch(config.warm_water.clone());
        if let Some(scene) = &config.goodmorning_lights_scene {
            home = home.with_scene(scene.clone());
        }
        home
    }

    /// Register a scene under `entity_id`.
    #[must_use]
    pub fn with_scene(mut self, entity_id: EntityId) -> Self {
        self.devices
            .insert(entity_id, VirtualDevice::Scene(VirtualScene::default()));
        self
    }

    /// Register a switch, initially off, under `entity_id`.
    #[must_use]
    pub fn with_switch(mut self, entity_id: EntityId) -> Self {
        self.devices
            .insert(entity_id, VirtualDevice::Switch(VirtualSwitch::default()));
        self
    }

    /// On/off state of a switch, `None` if `entity_id` is not a switch.
    #[must_use]
    pub fn is_on(&self, entity_id: &EntityId) -> Option<bool> {
        match self.devices.get(entity_id)? {
            VirtualDevice::Switch(switch) => Some(switch.is_on()),
            VirtualDevice::Scene(_) => None,
        }
    }

    /// Activation count of a scene, `None` if `entity_id` is not a scene.
    #[must_use]
    pub fn activations(&self, entity_id: &EntityId) -> Option<usize> {
        match self.devices.get(entity_id)? {
            VirtualDevice::Scene(scene) => Some(scene.activations()),
            VirtualDevice::Switch(_) => None,
        }
    }

    /// Every command received so far, in order.
    #[must_use]
    pub fn history(&self) -> Vec<Command> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn dispatch(&self, target: &EntityId, service: Service) -> Result<(), RoutinesError> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Command {
                target: target.clone(),
                service,
            });

        let device = self.devices.get(target).ok_or_else(|| {
            tracing::warn!(%target, %service, "command for unknown virtual entity");
            RoutinesError::UnknownEntity(target.clone())
        })?;
        device.handle_service(service);
        tracing::info!(%target, %service, "virtual device updated");
        Ok(())
    }
}

impl ActionDispatcher for VirtualHome {
    fn turn_on(&self, target: &EntityId) -> impl Future<Output = Result<(), RoutinesError>> + Send {
        let result = self.dispatch(target, Service::TurnOn);
        async { result }
    }

    fn turn_off(&self, target: &EntityId)
    -> impl Future<Output = Result<(), RoutinesError>> + Send {
        let result = self.dispatch(target, Service::TurnOff);
        async { result }
    }
}
