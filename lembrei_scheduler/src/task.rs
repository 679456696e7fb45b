use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Background task owned by exactly one holder. Dropping it cancels the task.
pub struct ScheduledTask {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ScheduledTask {
    /// Spawns `work` with a token that is cancelled when this handle is
    /// cancelled or dropped.
    pub fn spawn<F, Fut>(work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancellation_token = CancellationToken::new();
        let task_handle = tokio::spawn(work(cancellation_token.child_token()));

        Self {
            task_handle,
            cancellation_token,
        }
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// Cancels the task and waits until it has stopped.
    pub async fn shutdown(mut self) {
        self.cancellation_token.cancel();
        if let Err(e) = (&mut self.task_handle).await {
            if e.is_panic() {
                log::error!("Scheduled task panicked: {e}");
            }
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
