//! Typed access to a user's profile, daily goal and setup flag on top of any
//! [`PreferencesStore`].

use std::sync::Arc;

use anyhow::Result;
use shared::{UserRecord, DEFAULT_DAILY_GOAL_ML};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::traits::{PreferenceChange, PreferenceKey, PreferenceValue, PreferencesStore};

const PROFILE_KEYS: [PreferenceKey; 6] = [
    PreferenceKey::Weight,
    PreferenceKey::Height,
    PreferenceKey::Age,
    PreferenceKey::Sex,
    PreferenceKey::Activity,
    PreferenceKey::Environment,
];

#[derive(Clone)]
pub struct UserPreferences {
    store: Arc<dyn PreferencesStore>,
    default_daily_goal_ml: i64,
}

impl UserPreferences {
    pub fn new(store: Arc<dyn PreferencesStore>) -> Self {
        Self::with_default_goal(store, DEFAULT_DAILY_GOAL_ML)
    }

    pub fn with_default_goal(store: Arc<dyn PreferencesStore>, default_daily_goal_ml: i64) -> Self {
        Self {
            store,
            default_daily_goal_ml,
        }
    }

    /// The stored profile; missing fields read as blank
    pub async fn user_record(&self, username: &str) -> Result<UserRecord> {
        let mut fields = Vec::with_capacity(PROFILE_KEYS.len());
        for key in PROFILE_KEYS {
            fields.push(self.text(username, key).await?);
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        Ok(UserRecord {
            weight: next(),
            height: next(),
            age: next(),
            sex: next(),
            activity: next(),
            environment: next(),
        })
    }

    /// Overwrite the whole profile. Saving any record, even an empty one,
    /// marks setup as complete.
    pub async fn save_user_record(&self, username: &str, record: &UserRecord) -> Result<()> {
        debug!("Saving user record for {}", username);
        let values = vec![
            (PreferenceKey::Weight, PreferenceValue::Text(record.weight.clone())),
            (PreferenceKey::Height, PreferenceValue::Text(record.height.clone())),
            (PreferenceKey::Age, PreferenceValue::Text(record.age.clone())),
            (PreferenceKey::Sex, PreferenceValue::Text(record.sex.clone())),
            (PreferenceKey::Activity, PreferenceValue::Text(record.activity.clone())),
            (PreferenceKey::Environment, PreferenceValue::Text(record.environment.clone())),
            (PreferenceKey::SetupComplete, PreferenceValue::Flag(true)),
        ];
        self.store.set_many(username, values).await
    }

    pub async fn is_setup_complete(&self, username: &str) -> Result<bool> {
        let value = self.store.get(username, PreferenceKey::SetupComplete).await?;
        Ok(value.and_then(|v| v.as_flag()).unwrap_or(false))
    }

    pub async fn set_setup_complete(&self, username: &str, complete: bool) -> Result<()> {
        self.store
            .set(username, PreferenceKey::SetupComplete, PreferenceValue::Flag(complete))
            .await
    }

    /// The stored daily goal, or the default when none was saved
    pub async fn daily_goal(&self, username: &str) -> Result<i64> {
        let value = self.store.get(username, PreferenceKey::DailyGoal).await?;
        Ok(match value {
            Some(PreferenceValue::Int(goal)) => goal,
            Some(other) => {
                warn!("Ignoring malformed daily goal for {}: {:?}", username, other);
                self.default_daily_goal_ml
            }
            None => self.default_daily_goal_ml,
        })
    }

    pub async fn save_daily_goal(&self, username: &str, goal_ml: i64) -> Result<()> {
        self.store
            .set(username, PreferenceKey::DailyGoal, PreferenceValue::Int(goal_ml))
            .await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreferenceChange> {
        self.store.subscribe()
    }

    async fn text(&self, username: &str, key: PreferenceKey) -> Result<String> {
        let value = self.store.get(username, key).await?;
        Ok(value
            .as_ref()
            .and_then(|v| v.as_text())
            .unwrap_or_default()
            .to_string())
    }
}
