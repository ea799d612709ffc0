//! File-backed persisted settings.
//!
//! Settings are stored as a flat TOML table of boolean values keyed by the
//! setting path, for example:
//!
//! ```toml
//! "/exts/ecoplants.asset_provider/enable" = false
//! ```
//!
//! The file is re-read on every lookup so that edits show up without a restart.

use asset_store_core::{AssetStoreError, SettingStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileSettingStore {
    path: PathBuf,
}

impl FileSettingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> asset_store_core::Result<toml::Table> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => {
                return Err(AssetStoreError::Settings(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        toml::from_str(&content).map_err(|e| {
            AssetStoreError::Settings(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Persist a boolean setting, creating the file if needed.
    pub fn set_bool(&self, key: &str, value: bool) -> asset_store_core::Result<()> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), toml::Value::Boolean(value));

        let content = toml::to_string(&table)
            .map_err(|e| AssetStoreError::Settings(format!("Failed to serialize settings: {e}")))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AssetStoreError::Settings(format!(
                    "Failed to create settings directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&self.path, content).map_err(|e| {
            AssetStoreError::Settings(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!("Persisted setting {} = {} in {}", key, value, self.path.display());
        Ok(())
    }
}

impl SettingStore for FileSettingStore {
    fn get_bool(&self, key: &str) -> asset_store_core::Result<Option<bool>> {
        match self.read_table()?.get(key) {
            None => Ok(None),
            Some(toml::Value::Boolean(value)) => Ok(Some(*value)),
            Some(other) => Err(AssetStoreError::Settings(format!(
                "Setting {key} is not a boolean: {other}"
            ))),
        }
    }
}
