use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    errors::{RepoError, Result},
    storage::{CriteriaStore, JsonStore, MemoryStore},
    utils::persistence::save_json_atomic,
};

const APP_DIR: &str = "ploutos";
const CONFIG_FILE: &str = "config.json";

/// Which [`CriteriaStore`] backend to open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Memory,
    #[default]
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreKind,
    /// Directory holding the store file. Defaults to the directory the
    /// configuration was loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_store_file")]
    pub store_file: String,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            data_dir: None,
            store_file: Self::default_store_file(),
            log_filter: Self::default_log_filter(),
        }
    }
}

impl Config {
    fn default_store_file() -> String {
        "ploutos.json".into()
    }

    fn default_log_filter() -> String {
        "ploutos_core=info".into()
    }

    pub fn store_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(&self.store_file))
    }

    /// Opens the configured backend.
    pub fn open_store(&self) -> Result<Arc<dyn CriteriaStore>> {
        match self.store {
            StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreKind::Json => {
                let path = self.store_path().ok_or_else(|| {
                    RepoError::Config("json store requires a data directory".into())
                })?;
                Ok(Arc::new(JsonStore::open(path)?))
            }
        }
    }
}

/// Loads and saves [`Config`] under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses the platform data directory, e.g. `~/.local/share/ploutos`.
    pub fn new() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| RepoError::Config("no platform data directory".into()))?
            .join(APP_DIR);
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        let config_path = base.join(CONFIG_FILE);
        Ok(Self { base, config_path })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the saved configuration, or defaults when none is saved. A
    /// missing `data_dir` is filled in with the base directory.
    pub fn load(&self) -> Result<Config> {
        let mut config = if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data)
                .map_err(|err| RepoError::Config(format!("{}: {err}", self.config_path.display())))?
        } else {
            Config::default()
        };
        if config.data_dir.is_none() {
            config.data_dir = Some(self.base.clone());
        }
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        save_json_atomic(config, &self.config_path)
    }
}
