use config::{Config, ConfigError, Environment, File};
use lembrei_models::settings::Settings;

/// Layers defaults, `appsettings.toml`, `appsettings.local.toml` and
/// `APP_`-prefixed environment variables (`APP_STORAGE__PATH`).
pub fn load() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .set_default("storage.path", "lembrei-store.json")?
        .add_source(File::with_name("appsettings").required(false))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}
