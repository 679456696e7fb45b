use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use lembrei_models::chrono::{DateTime, TimeDelta, TimeZone, Utc};
use lembrei_scheduler::test_util::{NotifierCall, RecordingNotifier, TokioClock};
use lembrei_storage::{InMemoryKeyValueStore, STORAGE_KEY};

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HapticCall {
    Selection,
    Impact(ImpactStyle),
}

#[derive(Default)]
struct RecordingHaptics {
    calls: Mutex<Vec<HapticCall>>,
}

impl RecordingHaptics {
    fn calls(&self) -> Vec<HapticCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HapticFeedback for RecordingHaptics {
    fn selection(&self) {
        self.calls.lock().unwrap().push(HapticCall::Selection);
    }

    fn impact(&self, style: ImpactStyle) {
        self.calls.lock().unwrap().push(HapticCall::Impact(style));
    }
}

type Store = Arc<InMemoryKeyValueStore>;

struct TestContext {
    store: Store,
    notifier: RecordingNotifier,
    haptics: Arc<RecordingHaptics>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            store: Arc::new(InMemoryKeyValueStore::new()),
            notifier: RecordingNotifier::new(),
            haptics: Arc::new(RecordingHaptics::default()),
        }
    }

    async fn with_stored(raw: &str) -> Self {
        let ctx = Self::new();
        ctx.store.set(STORAGE_KEY, raw.to_owned()).await.unwrap();
        ctx
    }

    async fn controller(&self) -> AlarmController<Store> {
        let scheduler = AlarmScheduler::new(
            Arc::new(TokioClock::starting_at(t0())),
            Arc::new(self.notifier.clone()),
        );
        AlarmController::load(
            AlarmConfigStorage::new(Arc::clone(&self.store)),
            scheduler,
            self.haptics.clone(),
        )
        .await
    }

    async fn stored_config(&self) -> AlarmConfig {
        AlarmConfigStorage::new(Arc::clone(&self.store)).load().await
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 31, 12, 0, 0).unwrap()
}

fn hours(value: u8) -> Hours {
    Hours::try_from(value).unwrap()
}

fn minutes(value: u8) -> Minutes {
    Minutes::try_from(value).unwrap()
}

async fn wait(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[tokio::test(start_paused = true)]
async fn empty_storage_loads_default_config() {
    let ctx = TestContext::new();
    let controller = ctx.controller().await;

    assert_eq!(*controller.config(), AlarmConfig::default());
    assert_eq!(controller.countdown(), CountdownState::inactive());
    assert!(ctx.notifier.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn malformed_storage_loads_default_config() {
    let ctx = TestContext::with_stored("[1, 2, 3]").await;
    let controller = ctx.controller().await;

    assert_eq!(*controller.config(), AlarmConfig::default());
}

#[tokio::test(start_paused = true)]
async fn selections_are_persisted_with_feedback() {
    let ctx = TestContext::new();
    let mut controller = ctx.controller().await;

    assert!(controller.select_hours(hours(5)).await);
    assert!(controller.select_minutes(minutes(30)).await);
    assert!(controller.select_alert_type(AlertType::Sound).await);

    let expected = AlarmConfig {
        hours: hours(5),
        minutes: minutes(30),
        alert_type: AlertType::Sound,
        is_active: false,
    };
    assert_eq!(*controller.config(), expected);
    assert_eq!(ctx.stored_config().await, expected);
    assert_eq!(
        ctx.haptics.calls(),
        vec![
            HapticCall::Selection,
            HapticCall::Selection,
            HapticCall::Impact(ImpactStyle::Light),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn selections_are_ignored_while_active() {
    let ctx = TestContext::new();
    let mut controller = ctx.controller().await;
    controller.set_active(true).await;

    assert!(!controller.select_hours(hours(5)).await);
    assert!(!controller.select_minutes(minutes(30)).await);
    assert!(!controller.select_alert_type(AlertType::Silent).await);

    let config = controller.config();
    assert_eq!(config.hours, hours(1));
    assert_eq!(config.minutes, minutes(0));
    assert_eq!(config.alert_type, AlertType::Vibrate);
    assert_eq!(
        ctx.haptics.calls(),
        vec![HapticCall::Impact(ImpactStyle::Medium)]
    );
}

#[tokio::test(start_paused = true)]
async fn activation_starts_countdown_and_notification() {
    let ctx = TestContext::new();
    let mut controller = ctx.controller().await;
    controller.select_hours(hours(2)).await;
    controller.select_minutes(minutes(30)).await;

    controller.set_active(true).await;
    wait(Duration::from_millis(2500)).await;

    let countdown = controller.countdown();
    assert_eq!(
        countdown.next_alarm_date,
        Some(t0() + TimeDelta::seconds(9000))
    );
    assert_eq!(countdown.remaining_seconds, 8998);
    assert!(ctx.stored_config().await.is_active);
    assert_eq!(
        ctx.notifier.calls(),
        vec![NotifierCall::Schedule(
            t0() + TimeDelta::seconds(9000),
            AlertType::Vibrate
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn deactivation_resets_everything() {
    let ctx = TestContext::new();
    let mut controller = ctx.controller().await;
    controller.set_active(true).await;
    wait(Duration::from_secs(5)).await;

    controller.set_active(false).await;

    assert_eq!(controller.countdown(), CountdownState::inactive());
    assert!(!controller.config().is_active);
    assert!(!ctx.stored_config().await.is_active);
    assert_eq!(ctx.notifier.calls().last(), Some(&NotifierCall::Cancel));
    assert!(controller.select_hours(hours(3)).await);
}

#[tokio::test(start_paused = true)]
async fn repeated_toggle_is_a_no_op() {
    let ctx = TestContext::new();
    let mut controller = ctx.controller().await;

    controller.set_active(false).await;
    assert!(ctx.notifier.calls().is_empty());
    assert!(ctx.haptics.calls().is_empty());

    controller.set_active(true).await;
    controller.set_active(true).await;
    wait(Duration::from_millis(100)).await;
    assert_eq!(ctx.notifier.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stored_active_alarm_resumes_with_fresh_cycle() {
    let ctx = TestContext::with_stored(
        r#"{"hours":3,"minutes":0,"alertType":"som","isActive":true}"#,
    )
    .await;
    let controller = ctx.controller().await;
    wait(Duration::from_millis(100)).await;

    let countdown = controller.countdown();
    assert!(controller.config().is_active);
    assert_eq!(countdown.next_alarm_date, Some(t0() + TimeDelta::hours(3)));
    assert_eq!(
        ctx.notifier.calls(),
        vec![NotifierCall::Schedule(
            t0() + TimeDelta::hours(3),
            AlertType::Sound
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn subscribers_follow_the_countdown() {
    let ctx = TestContext::new();
    let mut controller = ctx.controller().await;
    let mut rx = controller.subscribe();

    controller.set_active(true).await;
    rx.borrow_and_update();
    rx.changed().await.unwrap();

    assert_eq!(rx.borrow().remaining_seconds, 3599);
}

#[test]
fn interval_description_omits_zero_minutes() {
    let config = AlarmConfig::default();
    assert_eq!(describe_interval(&config), "1 hour");

    let config = AlarmConfig {
        hours: hours(2),
        minutes: minutes(30),
        ..AlarmConfig::default()
    };
    assert_eq!(describe_interval(&config), "2 hours 30 minutes");
}
