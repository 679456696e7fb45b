use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lembrei_models::alarm::AlertType;

/// Platform facility that fires a local alert at a given instant.
///
/// At most one notification is pending; scheduling replaces it.
#[async_trait]
pub trait AlarmNotifier: Send + Sync + 'static {
    async fn schedule_notification(
        &self,
        at: DateTime<Utc>,
        alert_type: AlertType,
    ) -> anyhow::Result<()>;

    async fn cancel_notification(&self) -> anyhow::Result<()>;
}
