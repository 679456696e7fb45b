use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use lembrei_models::{
    alarm::AlertType,
    chrono::{DateTime, Local, Utc},
};
use lembrei_scheduler::{AlarmNotifier, ScheduledTask};
use tokio::sync::Mutex;

use crate::haptics::{HapticFeedback, ImpactStyle};

struct PendingAlert {
    at: DateTime<Utc>,
    alert_type: AlertType,
    fired: Arc<AtomicBool>,
    task: ScheduledTask,
}

/// Fires alerts on the terminal. Holds at most one pending alert.
#[derive(Default)]
pub struct ConsoleNotifier {
    pending: Mutex<Option<PendingAlert>>,
    alerts_fired: Arc<AtomicU64>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts_fired(&self) -> u64 {
        self.alerts_fired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlarmNotifier for ConsoleNotifier {
    async fn schedule_notification(
        &self,
        at: DateTime<Utc>,
        alert_type: AlertType,
    ) -> anyhow::Result<()> {
        let mut pending = self.pending.lock().await;

        // A due alert may be replaced before its timer got to run.
        if let Some(previous) = pending.take() {
            if previous.at <= Utc::now() {
                fire_once(
                    &previous.fired,
                    &self.alerts_fired,
                    previous.at,
                    previous.alert_type,
                );
            }
        }

        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        let fired = Arc::new(AtomicBool::new(false));
        let task_fired = Arc::clone(&fired);
        let alerts_fired = Arc::clone(&self.alerts_fired);
        let task = ScheduledTask::spawn(move |cancellation_token| async move {
            tokio::select! {
                _ = cancellation_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    fire_once(&task_fired, &alerts_fired, at, alert_type);
                }
            }
        });

        *pending = Some(PendingAlert {
            at,
            alert_type,
            fired,
            task,
        });
        Ok(())
    }

    async fn cancel_notification(&self) -> anyhow::Result<()> {
        if let Some(pending) = self.pending.lock().await.take() {
            pending.task.shutdown().await;
        }
        Ok(())
    }
}

fn fire_once(
    fired: &AtomicBool,
    alerts_fired: &AtomicU64,
    at: DateTime<Utc>,
    alert_type: AlertType,
) {
    if fired.swap(true, Ordering::SeqCst) {
        return;
    }
    alerts_fired.fetch_add(1, Ordering::SeqCst);

    let local = at.with_timezone(&Local).format("%H:%M:%S");
    log::info!("[ALERT] {alert_type} alert due at {at}");
    match alert_type {
        AlertType::Silent => println!("Reminder ({local})"),
        AlertType::Vibrate => println!("~~ Reminder ({local}) ~~"),
        AlertType::Sound => println!("\x07Reminder ({local})"),
    }
}

pub struct ConsoleHaptics;

impl HapticFeedback for ConsoleHaptics {
    fn selection(&self) {
        log::debug!("[HAPTIC] selection");
    }

    fn impact(&self, style: ImpactStyle) {
        log::debug!("[HAPTIC] impact {style:?}");
    }
}
