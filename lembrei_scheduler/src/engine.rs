use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use lembrei_models::{alarm::AlarmInterval, countdown::CountdownState};
use tokio::{sync::watch, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{Clock, ScheduledTask, compute_countdown};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Keeps a [`CountdownState`] up to date once per second while running.
///
/// The ticker is owned by the engine and released whenever the engine is
/// reconfigured, deactivated or dropped. Must be used inside a tokio runtime.
pub struct CountdownEngine {
    clock: Arc<dyn Clock>,
    state_tx: Arc<watch::Sender<CountdownState>>,
    ticker: Option<ScheduledTask>,
}

impl CountdownEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (state_tx, _) = watch::channel(CountdownState::inactive());

        Self {
            clock,
            state_tx: Arc::new(state_tx),
            ticker: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> CountdownState {
        *self.state_tx.borrow()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn activate(&mut self, start: DateTime<Utc>, interval: AlarmInterval) {
        self.configure(Some(start), interval, true);
    }

    pub fn deactivate(&mut self) {
        self.release_ticker();
        self.state_tx.send_replace(CountdownState::inactive());
        log::info!("[COUNTDOWN] Stopped");
    }

    /// Applies new inputs. The previous ticker is always released first.
    pub fn configure(
        &mut self,
        start: Option<DateTime<Utc>>,
        interval: AlarmInterval,
        is_active: bool,
    ) {
        self.release_ticker();

        let state = compute_countdown(start, interval, is_active, self.clock.now());
        self.state_tx.send_replace(state);

        let Some(start) = start.filter(|_| is_active) else {
            return;
        };

        log::info!(
            "[COUNTDOWN] Started at {start} with {}s interval, next alert at {:?}",
            interval.seconds(),
            state.next_alarm_date
        );

        let clock = Arc::clone(&self.clock);
        let state_tx = Arc::clone(&self.state_tx);
        self.ticker = Some(ScheduledTask::spawn(move |cancellation_token| {
            run_ticker(clock, state_tx, start, interval, cancellation_token)
        }));
    }

    fn release_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

async fn run_ticker(
    clock: Arc<dyn Clock>,
    state_tx: Arc<watch::Sender<CountdownState>>,
    start: DateTime<Utc>,
    interval: AlarmInterval,
    cancellation_token: CancellationToken,
) {
    let mut ticks = tokio::time::interval(TICK_PERIOD);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately and the state is already fresh.
    ticks.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            _ = ticks.tick() => {
                let state = compute_countdown(Some(start), interval, true, clock.now());
                // Checked under the channel lock, so a reset published after
                // cancellation is never overwritten by a late tick.
                state_tx.send_if_modified(|current| {
                    if cancellation_token.is_cancelled() || *current == state {
                        return false;
                    }
                    *current = state;
                    true
                });
            }
        }
    }

    log::debug!("[COUNTDOWN] Ticker released");
}

#[cfg(test)]
mod tests;
