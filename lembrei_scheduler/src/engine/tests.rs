use chrono::{TimeDelta, TimeZone};

use crate::test_util::TokioClock;

use super::*;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 31, 12, 0, 0).unwrap()
}

fn one_hour() -> AlarmInterval {
    AlarmInterval::from_seconds(3600).unwrap()
}

fn engine() -> CountdownEngine {
    CountdownEngine::new(Arc::new(TokioClock::starting_at(t0())))
}

async fn wait(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[tokio::test(start_paused = true)]
async fn new_engine_is_inactive() {
    let engine = engine();
    assert_eq!(engine.state(), CountdownState::inactive());
    assert!(!engine.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn activation_publishes_state_immediately() {
    let mut engine = engine();
    engine.activate(t0(), one_hour());

    let state = engine.state();
    assert_eq!(state.next_alarm_date, Some(t0() + TimeDelta::hours(1)));
    assert!((3599..=3600).contains(&state.remaining_seconds));
    assert!(engine.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn countdown_refreshes_every_second() {
    let mut engine = engine();
    engine.activate(t0(), one_hour());
    let initial = engine.state().remaining_seconds;

    wait(Duration::from_millis(2500)).await;

    let later = engine.state().remaining_seconds;
    assert!(later < initial, "later = {later}, initial = {initial}");
    assert_eq!(later, 3598);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_every_refresh() {
    let mut engine = engine();
    let mut rx = engine.subscribe();
    engine.activate(t0(), one_hour());
    rx.borrow_and_update();

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().remaining_seconds, 3599);

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().remaining_seconds, 3598);
}

#[tokio::test(start_paused = true)]
async fn deactivation_resets_and_stops_ticking() {
    let mut engine = engine();
    engine.activate(t0(), one_hour());
    wait(Duration::from_millis(1500)).await;

    engine.deactivate();
    assert_eq!(engine.state(), CountdownState::inactive());
    assert!(!engine.is_ticking());

    let mut rx = engine.subscribe();
    rx.borrow_and_update();
    wait(Duration::from_secs(10)).await;

    assert!(!rx.has_changed().unwrap());
    assert_eq!(engine.state(), CountdownState::inactive());
}

#[tokio::test(start_paused = true)]
async fn reactivation_restarts_cycle_from_new_start() {
    let mut engine = engine();
    engine.activate(t0(), one_hour());
    wait(Duration::from_millis(600_500)).await;
    assert_eq!(engine.state().remaining_seconds, 3000);

    engine.deactivate();
    let restart = t0() + TimeDelta::milliseconds(600_500);
    engine.activate(restart, one_hour());

    let state = engine.state();
    assert_eq!(state.next_alarm_date, Some(restart + TimeDelta::hours(1)));
    assert_eq!(state.remaining_seconds, 3600);
}

#[tokio::test(start_paused = true)]
async fn crossing_a_boundary_advances_to_next_cycle() {
    let mut engine = engine();
    let interval = AlarmInterval::from_seconds(5).unwrap();
    engine.activate(t0(), interval);

    wait(Duration::from_millis(6500)).await;

    let state = engine.state();
    assert_eq!(state.next_alarm_date, Some(t0() + TimeDelta::seconds(10)));
    assert_eq!(state.remaining_seconds, 4);
}

#[tokio::test(start_paused = true)]
async fn overdue_start_reports_future_trigger() {
    let mut engine = engine();
    engine.activate(t0() - TimeDelta::seconds(7200), one_hour());

    let state = engine.state();
    assert!(state.next_alarm_date.unwrap() > t0());
    assert_eq!(state.remaining_seconds, 3600);
}

#[tokio::test(start_paused = true)]
async fn inactive_configuration_does_not_tick() {
    let mut engine = engine();
    engine.configure(Some(t0()), one_hour(), false);
    assert!(!engine.is_ticking());
    assert_eq!(engine.state(), CountdownState::inactive());

    engine.configure(None, one_hour(), true);
    assert!(!engine.is_ticking());
    assert_eq!(engine.state(), CountdownState::inactive());
}

#[tokio::test(start_paused = true)]
async fn reconfiguring_replaces_the_ticker() {
    let mut engine = engine();
    engine.activate(t0(), one_hour());
    engine.activate(t0(), AlarmInterval::from_seconds(60).unwrap());

    wait(Duration::from_millis(2500)).await;

    let state = engine.state();
    assert_eq!(state.next_alarm_date, Some(t0() + TimeDelta::seconds(60)));
    assert_eq!(state.remaining_seconds, 58);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_engine_closes_the_channel() {
    let mut engine = engine();
    let mut rx = engine.subscribe();
    engine.activate(t0(), one_hour());
    drop(engine);

    wait(Duration::from_secs(2)).await;

    // The ticker held the last sender, so it must have exited.
    rx.borrow_and_update();
    assert!(rx.changed().await.is_err());
}
