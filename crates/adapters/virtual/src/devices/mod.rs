//! Virtual device implementations — scene, switch.

mod scene;
mod switch;

pub use scene::VirtualScene;
pub use switch::VirtualSwitch;

use crate::Service;

/// Wrapper enum for the concrete virtual device types.
pub enum VirtualDevice {
    Scene(VirtualScene),
    Switch(VirtualSwitch),
}

impl VirtualDevice {
    pub fn handle_service(&self, service: Service) {
        match self {
            Self::Scene(d) => d.handle_service(service),
            Self::Switch(d) => d.handle_service(service),
        }
    }
}
