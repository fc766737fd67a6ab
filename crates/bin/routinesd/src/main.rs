//! # routinesd — daily routines daemon
//!
//! Composition root that wires the routine to its adapters and runs it.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise structured logging
//! - Build the routine configuration from the `[app]` arguments
//! - Construct the virtual home, tokio timers and system clock (adapters)
//! - Feed state changes read from stdin into the host loop
//! - Stop on end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod input;

use std::sync::Arc;

use routines_adapter_virtual::VirtualHome;
use routines_app::config::RoutineConfig;
use routines_app::host;
use routines_app::ports::SystemClock;
use routines_app::services::daily_routines::DailyRoutines;
use routines_app::timer::TokioTimerScheduler;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration and logging
    let config = config::Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Adapters
    let routine_config =
        RoutineConfig::from_args(&config.app)?.with_local_zone(config.local_zone()?);
    let home = Arc::new(VirtualHome::for_config(&routine_config));
    let warm_water = routine_config.warm_water.clone();
    let (timers, fired) = TokioTimerScheduler::new();
    let routines = DailyRoutines::new(routine_config, Arc::clone(&home), timers, SystemClock);

    // Host input
    let (changes_tx, changes_rx) = mpsc::channel(32);
    tokio::spawn(input::forward_state_changes(
        BufReader::new(tokio::io::stdin()),
        changes_tx,
    ));

    tokio::select! {
        _ = host::run(routines, changes_rx, fired) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("shutdown requested");
        }
    }

    tracing::info!(
        commands = home.history().len(),
        warm_water_on = ?home.is_on(&warm_water),
        "routinesd stopped"
    );
    Ok(())
}
