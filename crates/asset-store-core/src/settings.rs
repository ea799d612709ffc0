//! Persisted host settings.
//!
//! Providers look up their enable flag through [`SettingStore`] when the
//! browser asks for their description. The host decides where the values
//! actually live.

use crate::Result;
use std::collections::HashMap;
use std::sync::RwLock;

/// Read access to the host's persisted boolean settings.
pub trait SettingStore: Send + Sync {
    /// Look up a boolean setting. `Ok(None)` means the key is not set.
    fn get_bool(&self, key: &str) -> Result<Option<bool>>;
}

/// In-process setting store.
#[derive(Debug, Default)]
pub struct MemorySettingStore {
    values: RwLock<HashMap<String, bool>>,
}

impl MemorySettingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: bool) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<bool> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.remove(key)
    }
}

impl SettingStore for MemorySettingStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).copied())
    }
}
