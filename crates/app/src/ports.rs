//! Port definitions — traits the host (or an adapter standing in for it) implements.
//!
//! Ports are the boundaries between the routine logic and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod clock;
pub mod dispatcher;
pub mod scheduler;

pub use clock::{Clock, SystemClock};
pub use dispatcher::ActionDispatcher;
pub use scheduler::TimerScheduler;
