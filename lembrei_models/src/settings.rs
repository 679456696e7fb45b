use std::path::PathBuf;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct StorageSettings {
    pub path: PathBuf,
}

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub storage: StorageSettings,
}
