use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use lembrei_models::alarm::AlertType;
use tokio::time::Instant;

use crate::{AlarmNotifier, Clock};

/// Wall clock that follows tokio's clock, so paused-time tests can move it.
pub struct TokioClock {
    origin_wall: DateTime<Utc>,
    origin: Instant,
}

impl TokioClock {
    pub fn starting_at(origin_wall: DateTime<Utc>) -> Self {
        Self {
            origin_wall,
            origin: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.origin.elapsed()).unwrap_or(TimeDelta::MAX);
        self.origin_wall + elapsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierCall {
    Schedule(DateTime<Utc>, AlertType),
    Cancel,
}

#[derive(Default, Clone)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<NotifierCall>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlarmNotifier for RecordingNotifier {
    async fn schedule_notification(
        &self,
        at: DateTime<Utc>,
        alert_type: AlertType,
    ) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(NotifierCall::Schedule(at, alert_type));
        Ok(())
    }

    async fn cancel_notification(&self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(NotifierCall::Cancel);
        Ok(())
    }
}
