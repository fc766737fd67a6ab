//! Virtual switch — responds to `turn_on`, `turn_off`.

use std::sync::{Mutex, PoisonError};

use crate::Service;

/// A simulated switch that can be turned on and off.
#[derive(Default)]
pub struct VirtualSwitch {
    on: Mutex<bool>,
}

impl VirtualSwitch {
    #[must_use]
    pub fn is_on(&self) -> bool {
        *self.on.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn handle_service(&self, service: Service) {
        let mut on = self.on.lock().unwrap_or_else(PoisonError::into_inner);
        *on = matches!(service, Service::TurnOn);
    }
}
