//! # YAML Preferences Repository
//!
//! Stores each user's preferences in `{user_directory}/preferences.yaml`.
//!
//! ## YAML Format
//!
//! ```yaml
//! weight: '72'
//! height: '180'
//! age: '34'
//! sex: Male
//! activity: Moderate
//! environment: Hot
//! daily_goal: 3200
//! setup_complete: true
//! ```
//!
//! Writes go through a temp file and a rename. Every successful write is
//! announced on the change stream.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::connection::CsvConnection;
use crate::storage::traits::{PreferenceChange, PreferenceKey, PreferenceValue, PreferencesStore};

const PREFERENCES_FILE: &str = "preferences.yaml";
const CHANGE_CHANNEL_CAPACITY: usize = 64;

type PreferenceMap = BTreeMap<String, PreferenceValue>;

/// File-backed [`PreferencesStore`]
#[derive(Clone)]
pub struct YamlPreferencesStore {
    connection: CsvConnection,
    // Serializes read-modify-write cycles within this process
    write_lock: Arc<Mutex<()>>,
    changes: broadcast::Sender<PreferenceChange>,
}

impl YamlPreferencesStore {
    pub fn new(connection: CsvConnection) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
            changes,
        }
    }

    fn preferences_path(&self, username: &str) -> PathBuf {
        self.connection.user_directory(username).join(PREFERENCES_FILE)
    }

    fn load_map(&self, username: &str) -> Result<PreferenceMap> {
        let path = self.preferences_path(username);
        if !path.exists() {
            return Ok(PreferenceMap::new());
        }

        let yaml_content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if yaml_content.trim().is_empty() {
            return Ok(PreferenceMap::new());
        }
        let map = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(map)
    }

    fn save_map(&self, username: &str, map: &PreferenceMap) -> Result<()> {
        let user_dir = self.connection.ensure_user_directory(username)?;
        let yaml_path = user_dir.join(PREFERENCES_FILE);
        let yaml_content = serde_yaml::to_string(map)?;

        let temp_path = yaml_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &yaml_path)?;

        debug!("Saved preferences for '{}' to {:?}", username, yaml_path);
        Ok(())
    }

    fn write_values(&self, username: &str, values: &[(PreferenceKey, PreferenceValue)]) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("Preferences write lock poisoned"))?;

        let mut map = self.load_map(username)?;
        for (key, value) in values {
            map.insert(key.name().to_string(), value.clone());
        }
        self.save_map(username, &map)
    }

    fn announce(&self, username: &str, values: Vec<(PreferenceKey, PreferenceValue)>) {
        for (key, value) in values {
            // No subscribers is fine
            let _ = self.changes.send(PreferenceChange {
                username: username.to_string(),
                key,
                value,
            });
        }
    }
}

#[async_trait]
impl PreferencesStore for YamlPreferencesStore {
    async fn get(&self, username: &str, key: PreferenceKey) -> Result<Option<PreferenceValue>> {
        let map = self.load_map(username)?;
        Ok(map.get(key.name()).cloned())
    }

    async fn set(&self, username: &str, key: PreferenceKey, value: PreferenceValue) -> Result<()> {
        self.set_many(username, vec![(key, value)]).await
    }

    async fn set_many(&self, username: &str, values: Vec<(PreferenceKey, PreferenceValue)>) -> Result<()> {
        self.write_values(username, &values)?;
        info!("Updated {} preference(s) for '{}'", values.len(), username);
        self.announce(username, values);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PreferenceChange> {
        self.changes.subscribe()
    }
}
