//! # Hydration Session
//!
//! One signed-in user's working state: the fluid log, the goal tracker and
//! handles to the collaborators. The UI holds a session from sign-in to
//! logout and passes it to whatever screen needs it.
//!
//! ## Flow
//!
//! Every log mutation follows the same path:
//!
//! 1. apply the change to the [`FluidLogStore`]
//! 2. re-evaluate the achievement state against the new total
//! 3. persist the whole log
//! 4. hand a [`LogMutationOutcome`] back to the UI
//!
//! When the save fails the mutation returns an [`UnsavedLogError`]. The
//! in-memory change stays applied so the screen keeps showing what the user
//! did, and the error carries the outcome, including a notice that fired.

use std::sync::Arc;

use anyhow::Result;
use shared::{
    EditLogRequest, FluidLog, FluidTypeTotal, GoalSuggestion, LogDrinkRequest, LogMutationOutcome,
    ProgressSnapshot, UserRecord,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::coach::{CoachService, HydrationCoachClient};
use super::fluid_log_store::FluidLogStore;
use super::goal_tracker::GoalTracker;
use super::input::parse_goal_text;
use crate::config::CoreConfig;
use crate::storage::{
    CsvConnection, FluidLogRepository, FluidLogStorage, MemoryFluidLogStorage,
    MemoryPreferencesStore, PreferenceChange, PreferencesStore, UserPreferences,
    YamlPreferencesStore,
};

/// A log mutation that was applied in memory but could not be saved
#[derive(Debug, thiserror::Error)]
#[error("Fluid log changed but could not be saved: {cause:#}")]
pub struct UnsavedLogError {
    /// What the mutation did, as if the save had succeeded
    pub outcome: LogMutationOutcome,
    pub cause: anyhow::Error,
}

/// Collaborators a session works with
#[derive(Clone)]
pub struct SessionServices {
    pub preferences: UserPreferences,
    pub log_storage: Arc<dyn FluidLogStorage>,
    pub coach: CoachService,
    pub recent_log_limit: usize,
}

impl SessionServices {
    pub fn new(
        preferences_store: Arc<dyn PreferencesStore>,
        log_storage: Arc<dyn FluidLogStorage>,
        coach_client: Arc<dyn HydrationCoachClient>,
        config: &CoreConfig,
    ) -> Self {
        Self {
            preferences: UserPreferences::with_default_goal(
                preferences_store,
                config.default_daily_goal_ml,
            ),
            log_storage,
            coach: CoachService::new(
                coach_client,
                config.default_daily_goal_ml,
                config.suggestion_fallback.clone(),
            ),
            recent_log_limit: config.recent_log_limit,
        }
    }

    /// Services backed by files under `config.data_directory`
    pub fn with_file_storage(
        config: &CoreConfig,
        coach_client: Arc<dyn HydrationCoachClient>,
    ) -> Result<Self> {
        let connection = CsvConnection::new(&config.data_directory)?;
        info!("Using file storage in {}", connection.base_directory().display());
        Ok(Self::new(
            Arc::new(YamlPreferencesStore::new(connection.clone())),
            Arc::new(FluidLogRepository::new(connection)),
            coach_client,
            config,
        ))
    }

    /// Services that keep everything in memory
    pub fn in_memory(config: &CoreConfig, coach_client: Arc<dyn HydrationCoachClient>) -> Self {
        Self::new(
            Arc::new(MemoryPreferencesStore::new()),
            Arc::new(MemoryFluidLogStorage::new()),
            coach_client,
            config,
        )
    }
}

/// Session-scoped context for one user
pub struct HydrationSession {
    username: String,
    logs: FluidLogStore,
    goal: GoalTracker,
    services: SessionServices,
}

impl HydrationSession {
    /// Sign in: load the saved goal and log, then evaluate achievement once
    pub async fn start(username: impl Into<String>, services: SessionServices) -> Result<Self> {
        let username = username.into();
        info!("Starting hydration session for '{}'", username);

        let goal_ml = services.preferences.daily_goal(&username).await?;
        let persisted = services.log_storage.load_logs(&username).await?;
        debug!("Restored {} fluid logs for '{}'", persisted.len(), username);

        let mut session = Self {
            username,
            logs: FluidLogStore::restore(persisted),
            goal: GoalTracker::new(goal_ml),
            services,
        };
        session.goal.observe(session.logs.total());
        Ok(session)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn log_drink(
        &mut self,
        request: LogDrinkRequest,
    ) -> Result<LogMutationOutcome, UnsavedLogError> {
        let entry = self.logs.append(request);
        info!(
            "Logged {} ml of {} for '{}'",
            entry.amount_ml, entry.fluid_type, self.username
        );

        let outcome = self.outcome(true, Some(entry));
        self.save_outcome(outcome).await
    }

    pub async fn edit_log(
        &mut self,
        request: EditLogRequest,
    ) -> Result<LogMutationOutcome, UnsavedLogError> {
        let id = request.id;
        if !self.logs.update(request) {
            warn!("No fluid log {} to edit for '{}'", id, self.username);
            return Ok(self.outcome(false, None));
        }

        debug!("Edited fluid log {} for '{}'", id, self.username);
        let entry = self.logs.get(id).cloned();
        let outcome = self.outcome(true, entry);
        self.save_outcome(outcome).await
    }

    pub async fn delete_log(
        &mut self,
        id: u64,
    ) -> Result<LogMutationOutcome, UnsavedLogError> {
        let Some(removed) = self.logs.remove(id) else {
            warn!("No fluid log {} to delete for '{}'", id, self.username);
            return Ok(self.outcome(false, None));
        };

        debug!("Deleted fluid log {} for '{}'", id, self.username);
        let outcome = self.outcome(true, Some(removed));
        self.save_outcome(outcome).await
    }

    /// Replace the daily goal and save it. The goal is not validated; a
    /// goal of zero or less shows no progress.
    pub async fn update_daily_goal(&mut self, goal_ml: i64) -> Result<ProgressSnapshot> {
        info!("Daily goal for '{}' set to {} ml", self.username, goal_ml);
        self.goal.set_goal(goal_ml);
        self.goal.observe(self.logs.total());
        self.services
            .preferences
            .save_daily_goal(&self.username, goal_ml)
            .await?;
        Ok(self.snapshot())
    }

    /// Goal as typed into the edit dialog; blank text keeps the current goal
    pub async fn update_daily_goal_from_text(&mut self, text: &str) -> Result<ProgressSnapshot> {
        let goal_ml = parse_goal_text(text, self.goal.goal())?;
        self.update_daily_goal(goal_ml).await
    }

    /// Dismiss a pending "goal reached" notice
    pub fn acknowledge_achievement(&mut self) -> bool {
        self.goal.acknowledge()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let total_ml = self.logs.total();
        ProgressSnapshot {
            total_ml,
            goal_ml: self.goal.goal(),
            progress: self.goal.progress(total_ml),
            remaining_ml: self.goal.remaining(total_ml),
            achieved: self.goal.is_achieved(total_ml),
            achievement: self.goal.reported_state(),
        }
    }

    /// The last few entries logged, as listed on the home screen
    pub fn recent_logs(&self) -> &[FluidLog] {
        self.logs.recent(self.services.recent_log_limit)
    }

    /// Every entry, most recently logged first
    pub fn log_history(&self) -> Vec<FluidLog> {
        self.logs.history().cloned().collect()
    }

    pub fn intake_by_type(&self) -> Vec<FluidTypeTotal> {
        self.logs.totals_by_type()
    }

    /// Ask the coach for a goal. Nothing is saved until the suggestion is
    /// accepted.
    pub async fn estimate_daily_goal(&self, profile: &UserRecord) -> GoalSuggestion {
        self.services.coach.suggest_daily_goal(profile).await
    }

    pub async fn accept_goal_suggestion(&mut self, suggestion: &GoalSuggestion) -> Result<ProgressSnapshot> {
        self.update_daily_goal(suggestion.goal_ml).await
    }

    pub async fn hydration_tip(&self, preferences: &str, habits: &str) -> String {
        self.services.coach.hydration_tip(preferences, habits).await
    }

    /// Finish first-run setup. An empty profile is not saved; a goal is
    /// saved only when one was chosen.
    pub async fn complete_setup(&mut self, record: &UserRecord, goal_ml: Option<i64>) -> Result<()> {
        if !record.is_empty() {
            self.save_profile(record).await?;
        }
        if let Some(goal_ml) = goal_ml {
            self.update_daily_goal(goal_ml).await?;
        }
        self.services
            .preferences
            .set_setup_complete(&self.username, true)
            .await?;
        info!("Setup complete for '{}'", self.username);
        Ok(())
    }

    pub async fn skip_setup(&mut self) -> Result<()> {
        info!("Setup skipped for '{}'", self.username);
        self.services
            .preferences
            .set_setup_complete(&self.username, true)
            .await
    }

    pub async fn is_setup_complete(&self) -> Result<bool> {
        self.services.preferences.is_setup_complete(&self.username).await
    }

    pub async fn profile(&self) -> Result<UserRecord> {
        self.services.preferences.user_record(&self.username).await
    }

    pub async fn save_profile(&mut self, record: &UserRecord) -> Result<()> {
        self.services
            .preferences
            .save_user_record(&self.username, record)
            .await
    }

    /// Preference writes from any session sharing this store
    pub fn preference_changes(&self) -> broadcast::Receiver<PreferenceChange> {
        self.services.preferences.subscribe()
    }

    /// Re-read the goal after it was changed elsewhere
    pub async fn refresh_goal(&mut self) -> Result<ProgressSnapshot> {
        let goal_ml = self.services.preferences.daily_goal(&self.username).await?;
        if goal_ml != self.goal.goal() {
            debug!("Goal for '{}' changed externally to {} ml", self.username, goal_ml);
            self.goal.set_goal(goal_ml);
        }
        self.goal.observe(self.logs.total());
        Ok(self.snapshot())
    }

    /// Log out
    pub fn end(self) {
        info!(
            "Ending hydration session for '{}' with {} ml logged",
            self.username,
            self.logs.total()
        );
    }

    fn outcome(&mut self, applied: bool, entry: Option<FluidLog>) -> LogMutationOutcome {
        let achievement_notice = self.goal.observe(self.logs.total());
        LogMutationOutcome {
            applied,
            entry,
            snapshot: self.snapshot(),
            achievement_notice,
        }
    }

    async fn save_outcome(
        &self,
        outcome: LogMutationOutcome,
    ) -> Result<LogMutationOutcome, UnsavedLogError> {
        match self.persist_logs().await {
            Ok(()) => Ok(outcome),
            Err(cause) => {
                warn!("Failed to save fluid logs for '{}': {:#}", self.username, cause);
                Err(UnsavedLogError { outcome, cause })
            }
        }
    }

    async fn persist_logs(&self) -> Result<()> {
        self.services
            .log_storage
            .save_logs(&self.username, self.logs.entries())
            .await
    }
}
