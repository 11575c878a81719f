//! Contract with the hydration coach (a text-generation service) and the
//! fallbacks applied when it cannot answer.
//!
//! The coach is called once per request: no retries, and any timeout policy
//! belongs to the client implementation. Failures never reach the user; a
//! goal estimate falls back to the default goal and a tip falls back to a
//! fixed message.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{GoalSuggestion, GoalSuggestionSource, UserRecord};
use tracing::{info, warn};

use super::input::extract_digits;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoachError {
    #[error("Coach service is unavailable")]
    Unavailable,
    #[error("Coach request failed: {0}")]
    Request(String),
    #[error("Coach reply did not contain a usable amount: {0:?}")]
    UnusableReply(String),
}

/// Text-generation backend used for goal estimates and tips
#[async_trait]
pub trait HydrationCoachClient: Send + Sync {
    /// Ask for an ideal daily intake. The raw reply is returned; the caller
    /// keeps only its digits.
    async fn estimate_daily_goal(&self, profile: &UserRecord) -> Result<String, CoachError>;

    /// Ask for a short drink recommendation or hydration tip
    async fn suggestion(&self, preferences: &str, habits: &str) -> Result<String, CoachError>;
}

/// Client used when no coach backend is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCoach;

#[async_trait]
impl HydrationCoachClient for OfflineCoach {
    async fn estimate_daily_goal(&self, _profile: &UserRecord) -> Result<String, CoachError> {
        Err(CoachError::Unavailable)
    }

    async fn suggestion(&self, _preferences: &str, _habits: &str) -> Result<String, CoachError> {
        Err(CoachError::Unavailable)
    }
}

/// Turn a coach reply into milliliters by keeping its digit characters
pub fn parse_goal_reply(reply: &str) -> Result<i64, CoachError> {
    let digits = extract_digits(reply);
    match digits.parse::<i64>() {
        Ok(goal_ml) if goal_ml > 0 => Ok(goal_ml),
        _ => Err(CoachError::UnusableReply(reply.to_string())),
    }
}

/// Wraps a coach client with the fallback policy
#[derive(Clone)]
pub struct CoachService {
    client: Arc<dyn HydrationCoachClient>,
    default_goal_ml: i64,
    fallback_message: String,
}

impl CoachService {
    pub fn new(
        client: Arc<dyn HydrationCoachClient>,
        default_goal_ml: i64,
        fallback_message: impl Into<String>,
    ) -> Self {
        Self {
            client,
            default_goal_ml,
            fallback_message: fallback_message.into(),
        }
    }

    /// Propose a daily goal for `profile`. Never fails: when the coach cannot
    /// answer, the default goal is proposed instead.
    pub async fn suggest_daily_goal(&self, profile: &UserRecord) -> GoalSuggestion {
        let estimate = self
            .client
            .estimate_daily_goal(profile)
            .await
            .and_then(|reply| parse_goal_reply(&reply));

        match estimate {
            Ok(goal_ml) => {
                info!("Coach suggested a daily goal of {} ml", goal_ml);
                GoalSuggestion {
                    goal_ml,
                    source: GoalSuggestionSource::Coach,
                }
            }
            Err(e) => {
                warn!("Goal estimate failed, suggesting default goal: {}", e);
                GoalSuggestion {
                    goal_ml: self.default_goal_ml,
                    source: GoalSuggestionSource::Default,
                }
            }
        }
    }

    /// A hydration tip, or the fallback message when none is available
    pub async fn hydration_tip(&self, preferences: &str, habits: &str) -> String {
        match self.client.suggestion(preferences, habits).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Coach returned an empty recommendation");
                self.fallback_message.clone()
            }
            Err(e) => {
                warn!("Recommendation request failed: {}", e);
                self.fallback_message.clone()
            }
        }
    }
}
