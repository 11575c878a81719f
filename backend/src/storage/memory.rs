//! In-process storage backends, used for tests and for sessions that should
//! not touch the disk.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::FluidLog;
use tokio::sync::broadcast;

use super::traits::{FluidLogStorage, PreferenceChange, PreferenceKey, PreferenceValue, PreferencesStore};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Preferences held in a map keyed by `"{username}_{key}"`
pub struct MemoryPreferencesStore {
    values: Mutex<HashMap<String, PreferenceValue>>,
    changes: broadcast::Sender<PreferenceChange>,
}

impl Default for MemoryPreferencesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPreferencesStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: Mutex::new(HashMap::new()),
            changes,
        }
    }
}

#[async_trait]
impl PreferencesStore for MemoryPreferencesStore {
    async fn get(&self, username: &str, key: PreferenceKey) -> Result<Option<PreferenceValue>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Preferences lock poisoned"))?;
        Ok(values.get(&key.storage_key(username)).cloned())
    }

    async fn set(&self, username: &str, key: PreferenceKey, value: PreferenceValue) -> Result<()> {
        {
            let mut values = self
                .values
                .lock()
                .map_err(|_| anyhow!("Preferences lock poisoned"))?;
            values.insert(key.storage_key(username), value.clone());
        }

        // No subscribers is fine
        let _ = self.changes.send(PreferenceChange {
            username: username.to_string(),
            key,
            value,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PreferenceChange> {
        self.changes.subscribe()
    }
}

/// Fluid logs held per user in memory
#[derive(Default)]
pub struct MemoryFluidLogStorage {
    logs: Mutex<HashMap<String, Vec<FluidLog>>>,
}

impl MemoryFluidLogStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FluidLogStorage for MemoryFluidLogStorage {
    async fn load_logs(&self, username: &str) -> Result<Vec<FluidLog>> {
        let logs = self.logs.lock().map_err(|_| anyhow!("Fluid log lock poisoned"))?;
        Ok(logs.get(username).cloned().unwrap_or_default())
    }

    async fn save_logs(&self, username: &str, entries: &[FluidLog]) -> Result<()> {
        let mut logs = self.logs.lock().map_err(|_| anyhow!("Fluid log lock poisoned"))?;
        logs.insert(username.to_string(), entries.to_vec());
        Ok(())
    }
}
