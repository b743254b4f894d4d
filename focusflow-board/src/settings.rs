//! Persisted application settings

use crate::error::Result;
use crate::types::AppSettings;
use focusflow_store::KeyValueStore;
use tracing::debug;

/// Key the settings record lives under
pub const DEFAULT_SETTINGS_KEY: &str = "focusflow-settings";

/// Loads and saves [`AppSettings`] under a single key-value entry
#[derive(Debug, Clone)]
pub struct SettingsStore {
    kv: KeyValueStore,
    key: String,
}

impl SettingsStore {
    pub fn new(kv: KeyValueStore, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored settings, or the defaults when nothing has been saved yet.
    ///
    /// Fields missing from an older record take their default values.
    pub async fn load(&self) -> Result<AppSettings> {
        let settings = self.kv.get_json::<AppSettings>(&self.key).await?;
        debug!(key = %self.key, found = settings.is_some(), "loaded settings");
        Ok(settings.unwrap_or_default())
    }

    /// Replace the stored settings
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        self.kv.set_json(&self.key, settings).await?;
        debug!(key = %self.key, "saved settings");
        Ok(())
    }

    /// Load, modify with `f`, save, and return the result
    pub async fn update(&self, f: impl FnOnce(&mut AppSettings)) -> Result<AppSettings> {
        let mut settings = self.load().await?;
        f(&mut settings);
        self.save(&settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ThemeMode;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(KeyValueStore::new(dir.path()), DEFAULT_SETTINGS_KEY)
    }

    #[tokio::test]
    async fn test_load_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        let settings = store(&dir).load().await.unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.pomodoro.work_duration, 25);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let dir = TempDir::new().unwrap();
        let settings = store(&dir);

        settings
            .update(|s| {
                s.pomodoro.work_duration = 50;
                s.theme.mode = ThemeMode::Dark;
            })
            .await
            .unwrap();

        let reloaded = store(&dir).load().await.unwrap();
        assert_eq!(reloaded.pomodoro.work_duration, 50);
        assert_eq!(reloaded.theme.mode, ThemeMode::Dark);
        assert!(dir.path().join("focusflow-settings.json").exists());
    }

    #[tokio::test]
    async fn test_partial_record_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("focusflow-settings.json"),
            r#"{"theme":{"mode":"light"}}"#,
        )
        .unwrap();

        let settings = store(&dir).load().await.unwrap();
        assert_eq!(settings.theme.mode, ThemeMode::Light);
        assert_eq!(settings.pomodoro.long_break_interval, 4);
    }
}
