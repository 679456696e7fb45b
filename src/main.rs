mod alarm;
mod appsettings;
mod console;
mod haptics;
mod interaction;

use std::sync::Arc;

use alarm::AlarmController;
use console::{ConsoleHaptics, ConsoleNotifier};
use interaction::TerminalInteractionInterface;
use lembrei_scheduler::{AlarmScheduler, SystemClock};
use lembrei_storage::{AlarmConfigStorage, FileKeyValueStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::load()?;
    log::debug!("Loaded settings {settings:?}");

    let store = match FileKeyValueStore::open(&settings.storage.path).await {
        Ok(store) => store,
        Err(e) => {
            log::warn!("Unable to open alarm store, starting empty. [error = {e}]");
            FileKeyValueStore::empty(&settings.storage.path)
        }
    };
    log::info!("Using alarm store at {}", store.path().display());

    let notifier = Arc::new(ConsoleNotifier::new());
    let scheduler = AlarmScheduler::new(Arc::new(SystemClock), notifier.clone());
    let mut controller = AlarmController::load(
        AlarmConfigStorage::new(store),
        scheduler,
        Arc::new(ConsoleHaptics),
    )
    .await;

    TerminalInteractionInterface::start(&mut controller, &notifier).await?;

    log::info!("Shutting down");
    Ok(())
}
