use lembrei_models::alarm::AlarmConfig;
use thiserror::Error;

use crate::KeyValueStore;

pub const STORAGE_KEY: &str = "@lembrei/alarm-config";

#[derive(Debug, Error)]
pub enum AlarmConfigStorageError {
    #[error("Unable to encode alarm config: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(Box<dyn std::error::Error + Send + Sync>),
}

/// Single overwritten alarm config record kept under [`STORAGE_KEY`].
pub struct AlarmConfigStorage<S> {
    store: S,
}

impl<S: KeyValueStore> AlarmConfigStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn save(&self, config: &AlarmConfig) -> Result<(), AlarmConfigStorageError> {
        let raw = serde_json::to_string(config)?;
        self.store
            .set(STORAGE_KEY, raw)
            .await
            .map_err(|e| AlarmConfigStorageError::Store(Box::new(e)))?;

        log::debug!("Saved alarm config {config:?}");
        Ok(())
    }

    /// Loads the stored config. Any failure falls back to the default config.
    pub async fn load(&self) -> AlarmConfig {
        let raw = match self.store.get(STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No alarm config stored, using default");
                return AlarmConfig::default();
            }
            Err(e) => {
                log::warn!("Unable to read alarm config, using default. [error = {e}]");
                return AlarmConfig::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Stored alarm config is malformed, using default. [error = {e}]");
                AlarmConfig::default()
            }
        }
    }
}
