use std::sync::Arc;

use chrono::{DateTime, Utc};
use lembrei_models::{
    alarm::{AlarmInterval, AlertType},
    countdown::CountdownState,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{AlarmNotifier, Clock, CountdownEngine, ScheduledTask};

/// Runs the countdown and keeps the platform notification armed for the
/// upcoming trigger.
pub struct AlarmScheduler {
    clock: Arc<dyn Clock>,
    engine: CountdownEngine,
    notifier: Arc<dyn AlarmNotifier>,
    notification_sync: Option<ScheduledTask>,
}

impl AlarmScheduler {
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn AlarmNotifier>) -> Self {
        let engine = CountdownEngine::new(Arc::clone(&clock));

        Self {
            clock,
            engine,
            notifier,
            notification_sync: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.engine.subscribe()
    }

    pub fn state(&self) -> CountdownState {
        self.engine.state()
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_ticking()
    }

    /// Starts a fresh cycle at the current time. An already running alarm is
    /// stopped first.
    pub async fn activate(
        &mut self,
        interval: AlarmInterval,
        alert_type: AlertType,
    ) -> DateTime<Utc> {
        if self.is_active() {
            if let Err(e) = self.deactivate().await {
                log::warn!("[NOTIFY] Unable to cancel previous notification. [error = {e:#}]");
            }
        }

        let start = self.clock.now();
        let rx = self.engine.subscribe();
        self.engine.activate(start, interval);

        let notifier = Arc::clone(&self.notifier);
        self.notification_sync = Some(ScheduledTask::spawn(move |cancellation_token| {
            sync_notifications(rx, notifier, alert_type, cancellation_token)
        }));

        start
    }

    /// Stops the countdown and withdraws the pending notification. The
    /// countdown is reset even when the notifier fails.
    pub async fn deactivate(&mut self) -> anyhow::Result<()> {
        if let Some(sync) = self.notification_sync.take() {
            sync.shutdown().await;
        }
        self.engine.deactivate();
        self.notifier.cancel_notification().await?;

        log::info!("[NOTIFY] Pending notification cancelled");
        Ok(())
    }
}

async fn sync_notifications(
    mut rx: watch::Receiver<CountdownState>,
    notifier: Arc<dyn AlarmNotifier>,
    alert_type: AlertType,
    cancellation_token: CancellationToken,
) {
    let mut scheduled_for = None;

    loop {
        let next_alarm_date = rx.borrow_and_update().next_alarm_date;
        if let Some(at) = next_alarm_date.filter(|at| scheduled_for != Some(*at)) {
            // One attempt per trigger, failures are not retried.
            scheduled_for = Some(at);
            match notifier.schedule_notification(at, alert_type).await {
                Ok(()) => log::info!("[NOTIFY] Scheduled {alert_type} alert at {at}"),
                Err(e) => {
                    log::warn!("[NOTIFY] Unable to schedule alert. [at = {at}, error = {e:#}]")
                }
            }
        }

        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}
