use std::sync::Arc;

use lembrei_models::{
    alarm::{AlarmConfig, AlertType, Hours, Minutes},
    countdown::CountdownState,
};
use lembrei_scheduler::AlarmScheduler;
use lembrei_storage::{AlarmConfigStorage, KeyValueStore};
use tokio::sync::watch;

use crate::haptics::{HapticFeedback, ImpactStyle};

/// Owns the user's alarm settings and keeps the scheduler and the stored
/// record in step with them.
///
/// Interval and alert type can only be changed while the alarm is off.
pub struct AlarmController<S> {
    config: AlarmConfig,
    storage: AlarmConfigStorage<S>,
    scheduler: AlarmScheduler,
    haptics: Arc<dyn HapticFeedback>,
}

impl<S: KeyValueStore> AlarmController<S> {
    /// Loads the stored config. An alarm that was active is resumed with a
    /// fresh cycle starting now.
    pub async fn load(
        storage: AlarmConfigStorage<S>,
        mut scheduler: AlarmScheduler,
        haptics: Arc<dyn HapticFeedback>,
    ) -> Self {
        let config = storage.load().await;
        if config.is_active {
            log::info!("Resuming active alarm every {}", describe_interval(&config));
            scheduler.activate(config.interval(), config.alert_type).await;
        }

        Self {
            config,
            storage,
            scheduler,
            haptics,
        }
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    pub fn countdown(&self) -> CountdownState {
        self.scheduler.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.scheduler.subscribe()
    }

    /// Returns `false` when the selection was ignored.
    pub async fn select_hours(&mut self, hours: Hours) -> bool {
        if self.selection_disabled("hours") {
            return false;
        }
        self.haptics.selection();
        self.config.hours = hours;
        self.persist().await;
        true
    }

    pub async fn select_minutes(&mut self, minutes: Minutes) -> bool {
        if self.selection_disabled("minutes") {
            return false;
        }
        self.haptics.selection();
        self.config.minutes = minutes;
        self.persist().await;
        true
    }

    pub async fn select_alert_type(&mut self, alert_type: AlertType) -> bool {
        if self.selection_disabled("alert type") {
            return false;
        }
        self.haptics.impact(ImpactStyle::Light);
        self.config.alert_type = alert_type;
        self.persist().await;
        true
    }

    pub async fn set_active(&mut self, is_active: bool) {
        if self.config.is_active == is_active {
            return;
        }
        self.haptics.impact(ImpactStyle::Medium);

        if is_active {
            let start = self
                .scheduler
                .activate(self.config.interval(), self.config.alert_type)
                .await;
            log::info!(
                "Alarm activated at {start}, every {}",
                describe_interval(&self.config)
            );
        } else {
            if let Err(e) = self.scheduler.deactivate().await {
                log::warn!("Alarm stopped but the notification was not withdrawn. [error = {e:#}]");
            }
            log::info!("Alarm deactivated");
        }

        self.config.is_active = is_active;
        self.persist().await;
    }

    fn selection_disabled(&self, what: &str) -> bool {
        if self.config.is_active {
            log::debug!("Ignoring {what} selection while the alarm is active");
        }
        self.config.is_active
    }

    async fn persist(&self) {
        if let Err(e) = self.storage.save(&self.config).await {
            log::warn!("Unable to save alarm config. [error = {e}]");
        }
    }
}

pub(crate) fn describe_interval(config: &AlarmConfig) -> String {
    if config.minutes.get() == 0 {
        config.hours.to_string()
    } else {
        format!("{} {}", config.hours, config.minutes)
    }
}

#[cfg(test)]
mod tests;
