//! # routines-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** the host must provide:
//!   - `ActionDispatcher` — turn scenes and devices on/off
//!   - `TimerScheduler` — one-shot delayed callbacks with cancellable handles
//!   - `Clock` — the current instant
//! - Load the routine configuration from host app arguments
//! - Schedule wake preparation (`WakePreparation`) and run the reactions
//!   (`DailyRoutines`)
//! - Provide **in-process infrastructure** (tokio timers, host loop) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `routines-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod actions;
pub mod config;
pub mod host;
pub mod ports;
pub mod preparation;
pub mod services;
pub mod timer;
