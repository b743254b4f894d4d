//! Board configuration
//!
//! Sources are merged with later ones winning:
//!
//! 1. Built-in defaults
//! 2. `focusflow.toml`, `focusflow.yaml`, `focusflow.json` in the working directory
//! 3. `FOCUSFLOW_*` environment variables, `__` separating nested keys
//!    (`FOCUSFLOW_STORAGE__BACKEND=memory`)
//! 4. [`ConfigOverrides`], usually from command line flags

use crate::error::Result;
use crate::settings::{SettingsStore, DEFAULT_SETTINGS_KEY};
use crate::types::Task;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use focusflow_store::{DatabaseAdapter, KeyValueAdapter, KeyValueStore, MemoryAdapter, StorageAdapter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Base name of the configuration files
pub const CONFIG_FILE_STEM: &str = "focusflow";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "FOCUSFLOW_";

/// Where tasks are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    /// Process memory only; nothing survives exit
    Memory,
    /// One JSON document holding the whole collection
    KeyValue,
    /// One SQLite row per task
    #[default]
    Database,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::KeyValue => "key-value",
            Self::Database => "database",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    /// Key (key-value backend) or table (database backend) holding tasks
    pub collection: String,
    /// Database file stem; the file is `<data_dir>/<database_name>.sqlite3`
    pub database_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            collection: "tasks".to_string(),
            database_name: "FocusFlowDB".to_string(),
        }
    }
}

/// Resolved configuration for one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub storage: StorageConfig,
    pub settings_key: String,
    /// Seed the sample tasks into an empty store on load
    pub seed_samples: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            settings_key: DEFAULT_SETTINGS_KEY.to_string(),
            seed_samples: true,
        }
    }
}

/// Highest-precedence values, typically parsed from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub backend: Option<StorageBackend>,
    pub data_dir: Option<PathBuf>,
}

impl BoardConfig {
    /// Load from the current working directory
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."), &ConfigOverrides::default())
    }

    /// Load with config files looked up in `dir`
    pub fn load_from(dir: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let config: Self = Self::figment(dir, overrides).extract()?;
        debug!(
            backend = %config.storage.backend,
            data_dir = %config.storage.data_dir.display(),
            "loaded board configuration"
        );
        Ok(config)
    }

    /// The merged provider stack
    pub fn figment(dir: &Path, overrides: &ConfigOverrides) -> Figment {
        let file = |ext: &str| dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));

        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file("toml")))
            .merge(Yaml::file(file("yaml")))
            .merge(Json::file(file("json")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(backend) = overrides.backend {
            figment = figment.merge(Serialized::default("storage.backend", backend));
        }
        if let Some(data_dir) = &overrides.data_dir {
            figment = figment.merge(Serialized::default("storage.data_dir", data_dir));
        }
        figment
    }

    /// Path of the SQLite file used by the database backend
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .data_dir
            .join(format!("{}.sqlite3", self.storage.database_name))
    }

    /// Key-value store rooted at the data directory
    pub fn key_value_store(&self) -> KeyValueStore {
        KeyValueStore::new(&self.storage.data_dir)
    }

    /// Build the task adapter for the configured backend
    pub fn open_adapter(&self) -> Result<Arc<dyn StorageAdapter<Task>>> {
        let collection = self.storage.collection.as_str();
        let adapter: Arc<dyn StorageAdapter<Task>> = match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryAdapter::<Task>::new()),
            StorageBackend::KeyValue => {
                Arc::new(KeyValueAdapter::<Task>::new(self.key_value_store(), collection)?)
            }
            StorageBackend::Database => {
                Arc::new(DatabaseAdapter::<Task>::open(self.database_path(), collection)?)
            }
        };
        debug!(backend = %self.storage.backend, collection, "opened task adapter");
        Ok(adapter)
    }

    /// Settings always live in the data directory, whatever the task backend
    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(self.key_value_store(), self.settings_key.clone())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("focusflow"))
        .unwrap_or_else(|| PathBuf::from(".focusflow"))
}
