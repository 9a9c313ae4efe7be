use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{SettingsResult, SettingsStore};

/// In-memory settings store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemSettingsStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for MemSettingsStore {
    fn load(&self, key: &str) -> SettingsResult<Option<Value>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> SettingsResult<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> SettingsResult<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}
