//! Daily routines service — goodnight, good-morning and wake preparation.

use routines_domain::state::{AWAKE, SLEEP, StateChange};
use routines_domain::subscription::{Reaction, Subscription};
use routines_domain::timer::{FiredTimer, TimerPurpose};
use routines_domain::wake::WakeTarget;

use crate::actions::RoutineActions;
use crate::config::RoutineConfig;
use crate::ports::{ActionDispatcher, Clock, TimerScheduler};
use crate::preparation::{WakePreparation, WakeTimeOutcome};

/// Reacts to sleep/awake changes and schedules wake preparation.
///
/// The host delivers notifications and fired timers one at a time; every
/// handler takes `&mut self`, so no locking is involved.
pub struct DailyRoutines<D, T, C> {
    config: RoutineConfig,
    actions: RoutineActions<D>,
    timers: T,
    clock: C,
    preparation: WakePreparation,
}

impl<D, T, C> DailyRoutines<D, T, C>
where
    D: ActionDispatcher,
    T: TimerScheduler,
    C: Clock,
{
    /// Create the routine with no timers armed.
    pub fn new(config: RoutineConfig, dispatcher: D, timers: T, clock: C) -> Self {
        let actions = RoutineActions::new(dispatcher, &config);
        let preparation = WakePreparation::new(config.prep_offset_minutes);
        tracing::info!(
            awake_state = %config.awake_state,
            next_awake_time = %config.next_awake_time,
            prep_offset_minutes = config.prep_offset_minutes,
            "daily routines initialized"
        );
        Self {
            config,
            actions,
            timers,
            clock,
            preparation,
        }
    }

    /// The state changes the host must deliver to [`handle_state_change`](Self::handle_state_change).
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription> {
        vec![
            Subscription::to_state(
                self.config.awake_state.clone(),
                SLEEP,
                Reaction::Goodnight,
            ),
            Subscription::to_state(
                self.config.awake_state.clone(),
                AWAKE,
                Reaction::GoodMorning,
            ),
            Subscription::any(self.config.next_awake_time.clone(), Reaction::NextWakeTime),
        ]
    }

    /// Run every reaction subscribed to `change`. Returns how many ran.
    pub async fn handle_state_change(&mut self, change: &StateChange) -> usize {
        let reactions: Vec<Reaction> = self
            .subscriptions()
            .into_iter()
            .filter(|sub| sub.matches(change))
            .map(|sub| sub.reaction)
            .collect();

        for reaction in &reactions {
            match reaction {
                Reaction::Goodnight => self.goodnight_triggered().await,
                Reaction::GoodMorning => self.awake_triggered().await,
                Reaction::NextWakeTime => {
                    self.next_awake_set(&change.new).await;
                }
            }
        }
        reactions.len()
    }

    /// Recompute the preparation window for a new wake time.
    ///
    /// Returns `None` when `value` cannot be parsed; the error is logged and
    /// the timers are left exactly as they were.
    pub async fn next_awake_set(&mut self, value: &str) -> Option<WakeTimeOutcome> {
        tracing::debug!(value, "next awake time set");
        let target = match WakeTarget::parse(value, self.config.local_zone) {
            Ok(target) => target,
            Err(error) => {
                tracing::error!(value, error = %error, "invalid datetime format for next awake time");
                return None;
            }
        };

        let now = self.clock.now();
        let outcome = self.preparation.reschedule(target, now, &self.timers);
        match outcome {
            WakeTimeOutcome::Scheduled { delay, .. } => {
                tracing::info!(
                    seconds = delay.as_secs(),
                    wake_at = %target.at(),
                    "scheduled preparation tasks"
                );
            }
            WakeTimeOutcome::BeginNow => {
                tracing::debug!("within preparation window, running preparation tasks immediately");
                self.awake_preparation_tasks().await;
            }
            WakeTimeOutcome::AlreadyPreparing => {
                tracing::debug!("preparation tasks already running, no immediate restart");
            }
            WakeTimeOutcome::WindowPassed => {
                tracing::debug!(%now, wake_at = %target.at(), "preparation window already passed");
            }
            WakeTimeOutcome::OutOfRange => {
                tracing::error!(
                    value,
                    prep_offset_minutes = self.preparation.offset_minutes(),
                    "preparation window out of range, ignoring next awake time"
                );
            }
        }
        Some(outcome)
    }

    /// Deliver a fired timer. Stale handles are ignored.
    pub async fn handle_timer(&mut self, fired: FiredTimer) {
        if !self.preparation.accept_fired(fired) {
            tracing::debug!(handle = %fired.handle, purpose = ?fired.purpose, "ignoring stale timer");
            return;
        }
        match fired.purpose {
            TimerPurpose::PreparationBegin => self.awake_preparation_tasks().await,
            TimerPurpose::PreparationEnd => self.awake_preparation_tasks_end().await,
        }
    }

    /// Sleep: lights-off scene, then warm water off. Preparation timers are
    /// left untouched.
    pub async fn goodnight_triggered(&self) {
        self.actions.activate_turn_off_lights_scene().await;
        self.actions.turn_warm_water(false).await;
        tracing::info!("goodnight routine executed");
    }

    /// Awake: good-morning scene when one is configured.
    pub async fn awake_triggered(&self) {
        if self.actions.activate_goodmorning_lights_scene().await {
            tracing::info!("awake routine executed");
        }
    }

    async fn awake_preparation_tasks(&mut self) {
        tracing::info!("performing wake-up preparation tasks");
        self.actions.turn_warm_water(true).await;
        let handle = self.preparation.begin(&self.timers);
        tracing::debug!(%handle, "scheduled preparation end");
    }

    async fn awake_preparation_tasks_end(&mut self) {
        tracing::info!("finishing wake-up preparation tasks");
        self.actions.turn_warm_water(false).await;
    }

    /// Current preparation timers.
    #[must_use]
    pub fn preparation(&self) -> &WakePreparation {
        &self.preparation
    }

    /// The action helpers, and through them the dispatcher.
    #[must_use]
    pub fn actions(&self) -> &RoutineActions<D> {
        &self.actions
    }

    /// The timer scheduler this routine arms and cancels timers on.
    #[must_use]
    pub fn timers(&self) -> &T {
        &self.timers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::tests::{Call, SpyDispatcher, config};
    use crate::preparation::Phase;
    use crate::preparation::tests::RecordingTimers;
    use chrono::{DateTime, Utc};
    use routines_domain::id::EntityId;
    use routines_domain::time::Timestamp;
    use std::sync::Mutex;
    use std::time::Duration;

    // ── Settable clock ─────────────────────────────────────────────

    struct FixedClock(Mutex<Timestamp>);

    impl FixedClock {
        fn at(s: &str) -> Self {
            Self(Mutex::new(s.parse().unwrap()))
        }

        fn set(&self, s: &str) {
            *self.0.lock().unwrap() = s.parse::<DateTime<Utc>>().unwrap();
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            *self.0.lock().unwrap()
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    type Routines = DailyRoutines<SpyDispatcher, RecordingTimers, FixedClock>;

    fn routines(now: &str, goodmorning: Option<&str>) -> Routines {
        DailyRoutines::new(
            config(goodmorning),
            SpyDispatcher::default(),
            RecordingTimers::default(),
            FixedClock::at(now),
        )
    }

    fn calls(r: &Routines) -> Vec<Call> {
        r.actions().dispatcher().calls()
    }

    fn warm_water(on: bool) -> Call {
        if on {
            Call::On("switch.warm_water".to_string())
        } else {
            Call::Off("switch.warm_water".to_string())
        }
    }

    fn change(entity: &str, old: Option<&str>, new: &str) -> StateChange {
        StateChange::new(EntityId::new(entity).unwrap(), old, new)
    }

    // ── Wake preparation ───────────────────────────────────────────

    #[tokio::test]
    async fn should_run_full_preparation_cycle() {
        let mut r = routines("2024-01-01T06:00:00Z", None);

        let outcome = r.next_awake_set("2024-01-01T07:00:00+00:00").await.unwrap();
        let WakeTimeOutcome::Scheduled { handle, delay } = outcome else {
            panic!("expected a scheduled outcome, got {outcome:?}");
        };
        assert_eq!(delay, Duration::from_secs(1800));
        assert!(calls(&r).is_empty());

        r.clock.set("2024-01-01T06:30:00Z");
        let fired = r.timers().fire(handle);
        r.handle_timer(fired).await;
        assert_eq!(calls(&r), vec![warm_water(true)]);
        assert_eq!(r.preparation().phase(), Phase::Preparing);

        let end = r.preparation().prep_end_timer().unwrap();
        let armed = r.timers().armed();
        let (_, end_armed) = armed.iter().find(|(h, _)| *h == end).unwrap();
        assert_eq!(end_armed.delay, Duration::from_secs(300));

        let fired = r.timers().fire(end);
        r.handle_timer(fired).await;
        assert_eq!(calls(&r), vec![warm_water(true), warm_water(false)]);
        assert_eq!(r.preparation().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn should_keep_single_prep_timer_across_updates() {
        let mut r = routines("2024-01-01T05:00:00Z", None);

        r.next_awake_set("2024-01-01T07:00:00+00:00").await;
        r.next_awake_set("2024-01-01T07:30:00+00:00").await;
        r.next_awake_set("2024-01-01T06:45:00+00:00").await;

        let live = r.timers().live(TimerPurpose::PreparationBegin);
        assert_eq!(live.len(), 1);
        assert_eq!(r.preparation().prep_timer(), Some(live[0]));
        assert_eq!(r.timers().cancelled().len(), 2);
    }

    #[tokio::test]
    async fn should_begin_synchronously_inside_window() {
        let mut r = routines("2024-01-01T06:45:00Z", None);

        let outcome = r.next_awake_set("2024-01-01T07:00:00+00:00").await;

        assert_eq!(outcome, Some(WakeTimeOutcome::BeginNow));
        assert_eq!(calls(&r), vec![warm_water(true)]);
        assert_eq!(r.timers().live(TimerPurpose::PreparationEnd).len(), 1);
    }

    #[tokio::test]
    async fn should_not_duplicate_preparation_inside_window() {
        let mut r = routines("2024-01-01T06:45:00Z", None);

        r.next_awake_set("2024-01-01T07:00:00+00:00").await;
        let end = r.preparation().prep_end_timer();
        let outcome = r.next_awake_set("2024-01-01T07:05:00+00:00").await;

        assert_eq!(outcome, Some(WakeTimeOutcome::AlreadyPreparing));
        assert_eq!(calls(&r), vec![warm_water(true)]);
        assert_eq!(r.preparation().prep_end_timer(), end);
    }

    #[tokio::test]
    async fn should_do_nothing_when_wake_time_passed() {
        let mut r = routines("2024-01-01T08:00:00Z", None);

        let outcome = r.next_awake_set("2024-01-01T07:00:00+00:00").await;

        assert_eq!(outcome, Some(WakeTimeOutcome::WindowPassed));
        assert!(calls(&r).is_empty());
        assert!(r.timers().armed().is_empty());
    }

    #[tokio::test]
    async fn should_leave_state_untouched_on_malformed_wake_time() {
        let mut r = routines("2024-01-01T05:00:00Z", None);
        r.next_awake_set("2024-01-01T07:00:00+00:00").await;
        let before = r.preparation().prep_timer();

        let outcome = r.next_awake_set("not-a-date").await;

        assert_eq!(outcome, None);
        assert_eq!(r.preparation().prep_timer(), before);
        assert!(r.timers().cancelled().is_empty());
        assert_eq!(r.timers().armed().len(), 1);
    }

    #[tokio::test]
    async fn should_log_and_drop_wake_time_when_offset_out_of_range() {
        let mut config = config(None);
        config.prep_offset_minutes = 9_000_000_000_000_000;
        let mut r = DailyRoutines::new(
            config,
            SpyDispatcher::default(),
            RecordingTimers::default(),
            FixedClock::at("2024-01-01T06:00:00Z"),
        );

        let outcome = r.next_awake_set("2024-01-01T07:00:00+00:00").await;

        assert_eq!(outcome, Some(WakeTimeOutcome::OutOfRange));
        assert!(calls(&r).is_empty());
        assert!(r.timers().armed().is_empty());
        assert_eq!(r.preparation().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn should_use_local_zone_for_naive_wake_time() {
        let mut r = routines("2024-01-01T06:00:00Z", None);

        let outcome = r.next_awake_set("2024-01-01 07:00:00").await;

        assert!(matches!(
            outcome,
            Some(WakeTimeOutcome::Scheduled { delay, .. }) if delay == Duration::from_secs(1800)
        ));
    }

    #[tokio::test]
    async fn should_ignore_stale_fired_timer() {
        let mut r = routines("2024-01-01T05:00:00Z", None);
        let Some(WakeTimeOutcome::Scheduled { handle: stale, .. }) =
            r.next_awake_set("2024-01-01T07:00:00+00:00").await
        else {
            panic!("expected a scheduled outcome");
        };
        r.next_awake_set("2024-01-01T07:10:00+00:00").await;

        r.handle_timer(FiredTimer {
            handle: stale,
            purpose: TimerPurpose::PreparationBegin,
        })
        .await;

        assert!(calls(&r).is_empty());
        assert_eq!(r.preparation().phase(), Phase::PrepScheduled);
    }

    // ── Sleep / awake ──────────────────────────────────────────────

    #[tokio::test]
    async fn should_turn_lights_and_warm_water_off_on_sleep() {
        let mut r = routines("2024-01-01T22:00:00Z", None);

        let ran = r
            .handle_state_change(&change("input_select.awake_state", Some("awake"), "sleep"))
            .await;

        assert_eq!(ran, 1);
        assert_eq!(
            calls(&r),
            vec![Call::On("scene.lights_off".to_string()), warm_water(false)]
        );
    }

    #[tokio::test]
    async fn should_not_touch_timers_on_sleep() {
        let mut r = routines("2024-01-01T06:45:00Z", None);
        r.next_awake_set("2024-01-01T07:00:00+00:00").await;
        r.next_awake_set("2024-01-02T07:00:00+00:00").await;
        let prep = r.preparation().prep_timer();
        let end = r.preparation().prep_end_timer();
        let cancelled = r.timers().cancelled().len();

        r.handle_state_change(&change("input_select.awake_state", Some("awake"), "sleep"))
            .await;

        assert_eq!(r.preparation().prep_timer(), prep);
        assert_eq!(r.preparation().prep_end_timer(), end);
        assert_eq!(r.timers().cancelled().len(), cancelled);
    }

    #[tokio::test]
    async fn should_not_rerun_goodnight_when_sleep_repeats() {
        let mut r = routines("2024-01-01T22:00:00Z", None);

        let ran = r
            .handle_state_change(&change("input_select.awake_state", Some("sleep"), "sleep"))
            .await;

        assert_eq!(ran, 0);
        assert!(calls(&r).is_empty());
    }

    #[tokio::test]
    async fn should_not_restart_preparation_when_wake_time_repeats() {
        let mut r = routines("2024-01-01T06:45:00Z", None);
        let wake = "2024-01-01T07:00:00+00:00";
        r.handle_state_change(&change("input_datetime.next_awake", None, wake))
            .await;
        let end = r.preparation().prep_end_timer().unwrap();
        let fired = r.timers().fire(end);
        r.handle_timer(fired).await;

        let ran = r
            .handle_state_change(&change("input_datetime.next_awake", Some(wake), wake))
            .await;

        assert_eq!(ran, 0);
        assert_eq!(calls(&r), vec![warm_water(true), warm_water(false)]);
        assert_eq!(r.preparation().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn should_activate_goodmorning_scene_on_awake() {
        let mut r = routines("2024-01-01T07:00:00Z", Some("scene.good_morning"));

        r.handle_state_change(&change("input_select.awake_state", Some("sleep"), "awake"))
            .await;

        assert_eq!(calls(&r), vec![Call::On("scene.good_morning".to_string())]);
    }

    #[tokio::test]
    async fn should_skip_awake_reaction_without_scene() {
        let mut r = routines("2024-01-01T07:00:00Z", None);

        let ran = r
            .handle_state_change(&change("input_select.awake_state", Some("sleep"), "awake"))
            .await;

        assert_eq!(ran, 1);
        assert!(calls(&r).is_empty());
    }

    #[tokio::test]
    async fn should_ignore_other_sleep_values() {
        let mut r = routines("2024-01-01T07:00:00Z", Some("scene.good_morning"));

        let ran = r
            .handle_state_change(&change("input_select.awake_state", Some("sleep"), "napping"))
            .await;

        assert_eq!(ran, 0);
        assert!(calls(&r).is_empty());
    }

    #[tokio::test]
    async fn should_route_wake_time_changes_to_scheduler() {
        let mut r = routines("2024-01-01T05:00:00Z", None);

        let ran = r
            .handle_state_change(&change(
                "input_datetime.next_awake",
                None,
                "2024-01-01T07:00:00+00:00",
            ))
            .await;

        assert_eq!(ran, 1);
        assert_eq!(r.preparation().phase(), Phase::PrepScheduled);
    }

    #[tokio::test]
    async fn should_ignore_unrelated_entities() {
        let mut r = routines("2024-01-01T05:00:00Z", None);

        let ran = r
            .handle_state_change(&change("sensor.outside_temperature", None, "sleep"))
            .await;

        assert_eq!(ran, 0);
    }

    #[test]
    fn should_publish_three_subscriptions() {
        let r = routines("2024-01-01T05:00:00Z", None);
        let subs = r.subscriptions();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].new_state.as_deref(), Some("sleep"));
        assert_eq!(subs[1].new_state.as_deref(), Some("awake"));
        assert_eq!(subs[2].entity_id.as_str(), "input_datetime.next_awake");
        assert_eq!(subs[2].new_state, None);
    }
}
