//! # Storage Traits
//!
//! Storage abstractions the domain layer depends on. Every operation is
//! scoped to one username; users never see each other's data.

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::FluidLog;
use tokio::sync::broadcast;

/// The per-user preference entries the core reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    Weight,
    Height,
    Age,
    Sex,
    Activity,
    Environment,
    DailyGoal,
    SetupComplete,
}

impl PreferenceKey {
    pub fn name(&self) -> &'static str {
        match self {
            PreferenceKey::Weight => "weight",
            PreferenceKey::Height => "height",
            PreferenceKey::Age => "age",
            PreferenceKey::Sex => "sex",
            PreferenceKey::Activity => "activity",
            PreferenceKey::Environment => "environment",
            PreferenceKey::DailyGoal => "daily_goal",
            PreferenceKey::SetupComplete => "setup_complete",
        }
    }

    /// Flat key namespaced by user, e.g. `ana_daily_goal`
    pub fn storage_key(&self, username: &str) -> String {
        format!("{}_{}", username, self.name())
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Flag(bool),
    Int(i64),
    Text(String),
}

impl PreferenceValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PreferenceValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PreferenceValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            PreferenceValue::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

/// Emitted after every successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceChange {
    pub username: String,
    pub key: PreferenceKey,
    pub value: PreferenceValue,
}

/// Durable per-user key-value storage.
///
/// Writes complete asynchronously; readers that need to react to changes made
/// elsewhere subscribe to the change stream.
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Read a value; None when it was never written
    async fn get(&self, username: &str, key: PreferenceKey) -> Result<Option<PreferenceValue>>;

    /// Write a value and notify subscribers
    async fn set(&self, username: &str, key: PreferenceKey, value: PreferenceValue) -> Result<()>;

    /// Write several values for one user in a single update
    async fn set_many(&self, username: &str, values: Vec<(PreferenceKey, PreferenceValue)>) -> Result<()> {
        for (key, value) in values {
            self.set(username, key, value).await?;
        }
        Ok(())
    }

    /// Stream of changes across all users
    fn subscribe(&self) -> broadcast::Receiver<PreferenceChange>;
}

/// Persistence for a user's fluid log
#[async_trait]
pub trait FluidLogStorage: Send + Sync {
    /// Load all entries in logging order
    async fn load_logs(&self, username: &str) -> Result<Vec<FluidLog>>;

    /// Replace the stored log with `logs`
    async fn save_logs(&self, username: &str, logs: &[FluidLog]) -> Result<()>;
}
