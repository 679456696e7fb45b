use std::{
    collections::HashMap,
    convert::Infallible,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;
    async fn set(&self, key: &str, value: String) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    type Error = T::Error;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Self::Error> {
        self.as_ref().set(key, value).await
    }
}

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    store: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    type Error = Infallible;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Self::Error> {
        let mut store = self.store.write().await;
        store.insert(key.to_owned(), value);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Store file is not a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store persisted as one JSON object in a single file.
///
/// Every `set` rewrites the whole file.
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`. A missing file starts empty. A file that
    /// cannot be parsed is moved aside to `<path>.bak` and the store starts
    /// empty. Only other I/O failures are returned.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(contents) if contents.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(contents) => match serde_json::from_slice(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "Store file {} is unreadable, starting empty. [error = {e}]",
                        path.display()
                    );
                    set_aside(&path).await;
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No store file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                log::warn!(
                    "Store file {} is unreadable, starting empty. [error = {e}]",
                    path.display()
                );
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::with_entries(path, entries))
    }

    /// Empty store that writes to `path` without reading it first.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::with_entries(path.into(), HashMap::new())
    }

    fn with_entries(path: PathBuf, entries: HashMap<String, String>) -> Self {
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, entries: &HashMap<String, String>) -> Result<(), FileStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

async fn set_aside(path: &Path) {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    let backup = PathBuf::from(backup);

    match tokio::fs::rename(path, &backup).await {
        Ok(()) => log::info!("Moved unreadable store file to {}", backup.display()),
        Err(e) => log::warn!(
            "Unable to move unreadable store file aside. [path = {}, error = {e}]",
            path.display()
        ),
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    type Error = FileStoreError;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Self::Error> {
        let mut entries = self.entries.write().await;
        let previous = entries.insert(key.to_owned(), value);
        if let Err(e) = self.flush(&entries).await {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(previous) => entries.insert(key.to_owned(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
