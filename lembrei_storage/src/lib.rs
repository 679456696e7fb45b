mod alarm_config;
mod key_value;

pub use alarm_config::{AlarmConfigStorage, AlarmConfigStorageError, STORAGE_KEY};
pub use key_value::{FileKeyValueStore, FileStoreError, InMemoryKeyValueStore, KeyValueStore};
