//! Virtual scene — counts activations; turning a scene off does nothing.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Service;

#[derive(Default)]
pub struct VirtualScene {
    activations: AtomicUsize,
}

impl VirtualScene {
    #[must_use]
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::Relaxed)
    }

    pub fn handle_service(&self, service: Service) {
        if service == Service::TurnOn {
            self.activations.fetch_add(1, Ordering::Relaxed);
        }
    }
}
