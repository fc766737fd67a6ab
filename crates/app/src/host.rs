//! In-process host loop.
//!
//! Delivers state changes and fired timers to a [`DailyRoutines`] strictly
//! one at a time, the way the home-automation host would.

use tokio::sync::mpsc;

use routines_domain::state::StateChange;
use routines_domain::timer::FiredTimer;

use crate::ports::{ActionDispatcher, Clock, TimerScheduler};
use crate::services::daily_routines::DailyRoutines;

/// Drive `routines` until the state-change channel closes.
///
/// Returns the routine so callers can inspect its final state. Timers still
/// armed at that point are not awaited.
pub async fn run<D, T, C>(
    mut routines: DailyRoutines<D, T, C>,
    mut changes: mpsc::Receiver<StateChange>,
    mut fired: mpsc::UnboundedReceiver<FiredTimer>,
) -> DailyRoutines<D, T, C>
where
    D: ActionDispatcher,
    T: TimerScheduler,
    C: Clock,
{
    tracing::info!(subscriptions = routines.subscriptions().len(), "host loop started");
    loop {
        tokio::select! {
            biased;
            Some(timer) = fired.recv() => {
                routines.handle_timer(timer).await;
            }
            change = changes.recv() => match change {
                Some(change) => {
                    let ran = routines.handle_state_change(&change).await;
                    tracing::trace!(entity = %change.entity_id, ran, "state change delivered");
                }
                None => break,
            },
        }
    }
    tracing::info!("host loop stopped");
    routines
}
