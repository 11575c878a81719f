//! Daily goal and the "goal achieved" celebration trigger.
//!
//! The celebration is edge-triggered: it fires once when intake crosses the
//! goal from below, stays quiet while intake remains at or above the goal,
//! and re-arms as soon as intake drops below the goal again.
//!
//! ```text
//! NotAchieved --(total >= goal)--> AchievedPendingNotice --(acknowledge)--> AchievedNoticeShown
//!      ^                                   |                                        |
//!      +------------(total < goal)---------+----------------------------------------+
//! ```

use shared::{AchievementState, DEFAULT_DAILY_GOAL_ML};
use tracing::{debug, info};

/// Holds the daily goal and the achievement state for one session
#[derive(Debug, Clone)]
pub struct GoalTracker {
    goal_ml: i64,
    state: AchievementState,
}

impl Default for GoalTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_GOAL_ML)
    }
}

impl GoalTracker {
    pub fn new(goal_ml: i64) -> Self {
        Self {
            goal_ml,
            state: AchievementState::NotAchieved,
        }
    }

    pub fn goal(&self) -> i64 {
        self.goal_ml
    }

    /// Replace the goal. Zero and negative values are accepted as-is.
    pub fn set_goal(&mut self, goal_ml: i64) {
        debug!("Daily goal changed from {} to {} ml", self.goal_ml, goal_ml);
        self.goal_ml = goal_ml;
    }

    /// Fraction of the goal reached; 0.0 whenever the goal is not positive
    pub fn progress(&self, total_ml: u64) -> f64 {
        if self.goal_ml <= 0 {
            return 0.0;
        }
        total_ml as f64 / self.goal_ml as f64
    }

    pub fn is_achieved(&self, total_ml: u64) -> bool {
        self.goal_ml > 0 && as_signed(total_ml) >= self.goal_ml
    }

    /// Milliliters still to drink, never negative
    pub fn remaining(&self, total_ml: u64) -> u64 {
        let remaining = self.goal_ml.saturating_sub(as_signed(total_ml));
        u64::try_from(remaining).unwrap_or(0)
    }

    pub fn state(&self) -> AchievementState {
        self.state
    }

    /// State as shown to the user. A goal of zero or less can't be reached,
    /// so it always reads as `NotAchieved`.
    pub fn reported_state(&self) -> AchievementState {
        if self.goal_ml > 0 {
            self.state
        } else {
            AchievementState::NotAchieved
        }
    }

    /// Re-evaluate the achievement state against the current intake.
    ///
    /// Returns true exactly when this call moved the tracker from
    /// `NotAchieved` to `AchievedPendingNotice`.
    pub fn observe(&mut self, total_ml: u64) -> bool {
        if self.is_achieved(total_ml) {
            if self.state == AchievementState::NotAchieved {
                info!(
                    "Daily goal reached: {} ml of {} ml",
                    total_ml, self.goal_ml
                );
                self.state = AchievementState::AchievedPendingNotice;
                return true;
            }
        } else if as_signed(total_ml) < self.goal_ml {
            if self.state != AchievementState::NotAchieved {
                debug!("Intake dropped below goal, re-arming achievement notice");
            }
            self.state = AchievementState::NotAchieved;
        }
        false
    }

    /// Mark a pending notice as shown; false when no notice was pending
    pub fn acknowledge(&mut self) -> bool {
        if self.state == AchievementState::AchievedPendingNotice {
            self.state = AchievementState::AchievedNoticeShown;
            true
        } else {
            false
        }
    }
}

fn as_signed(total_ml: u64) -> i64 {
    i64::try_from(total_ml).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_goal() {
        assert_eq!(GoalTracker::default().goal(), 3000);
    }

    #[test]
    fn test_progress_and_achievement() {
        let tracker = GoalTracker::new(3000);

        assert!((tracker.progress(3100) - 3100.0 / 3000.0).abs() < 1e-9);
        assert!(tracker.is_achieved(3100));
        assert!(tracker.is_achieved(3000));

        assert!((tracker.progress(1200) - 0.4).abs() < 1e-9);
        assert!(!tracker.is_achieved(1200));
    }

    #[test]
    fn test_zero_and_negative_goal_are_guarded() {
        let mut tracker = GoalTracker::new(3000);
        tracker.set_goal(0);
        assert_eq!(tracker.goal(), 0);
        assert_eq!(tracker.progress(1500), 0.0);
        assert_eq!(tracker.progress(0), 0.0);
        assert!(!tracker.is_achieved(1500));

        tracker.set_goal(-250);
        assert_eq!(tracker.progress(1500), 0.0);
        assert!(!tracker.is_achieved(1500));
        assert_eq!(tracker.remaining(1500), 0);
    }

    #[test]
    fn test_remaining() {
        let tracker = GoalTracker::new(2000);
        assert_eq!(tracker.remaining(0), 2000);
        assert_eq!(tracker.remaining(1500), 500);
        assert_eq!(tracker.remaining(2500), 0);
    }

    #[test]
    fn test_notice_fires_once_per_crossing() {
        let mut tracker = GoalTracker::new(3000);

        assert!(!tracker.observe(1200));
        assert_eq!(tracker.state(), AchievementState::NotAchieved);

        assert!(tracker.observe(3100));
        assert_eq!(tracker.state(), AchievementState::AchievedPendingNotice);

        // Still above goal: no second notice, before or after dismissal
        assert!(!tracker.observe(3100));
        assert!(!tracker.observe(3400));
        assert!(tracker.acknowledge());
        assert_eq!(tracker.state(), AchievementState::AchievedNoticeShown);
        assert!(!tracker.observe(3600));
        assert_eq!(tracker.state(), AchievementState::AchievedNoticeShown);
    }

    #[test]
    fn test_oscillation_refires_on_each_upward_crossing() {
        let mut tracker = GoalTracker::new(3000);
        let totals = [2900, 3000, 3050, 2999, 2500, 3000, 3000, 1000, 4000];
        let fired: Vec<bool> = totals.iter().map(|total| tracker.observe(*total)).collect();

        assert_eq!(
            fired,
            vec![false, true, false, false, false, true, false, false, true]
        );
    }

    #[test]
    fn test_drop_below_after_dismissal_rearms() {
        let mut tracker = GoalTracker::new(3000);
        assert!(tracker.observe(3100));
        assert!(tracker.acknowledge());

        assert!(!tracker.observe(1200));
        assert_eq!(tracker.state(), AchievementState::NotAchieved);

        assert!(tracker.observe(3000));
    }

    #[test]
    fn test_acknowledge_without_pending_notice() {
        let mut tracker = GoalTracker::new(3000);
        assert!(!tracker.acknowledge());
        assert_eq!(tracker.state(), AchievementState::NotAchieved);

        tracker.observe(3000);
        assert!(tracker.acknowledge());
        assert!(!tracker.acknowledge());
    }

    #[test]
    fn test_goal_change_moves_the_boundary() {
        let mut tracker = GoalTracker::new(3000);
        assert!(tracker.observe(3100));

        // Raising the goal above intake re-arms
        tracker.set_goal(3500);
        assert!(!tracker.observe(3100));
        assert_eq!(tracker.state(), AchievementState::NotAchieved);

        // Lowering it back under intake fires again
        tracker.set_goal(2500);
        assert!(tracker.observe(3100));
    }

    #[test]
    fn test_zero_goal_never_fires() {
        let mut tracker = GoalTracker::new(0);
        assert!(!tracker.observe(0));
        assert!(!tracker.observe(5000));
        assert_eq!(tracker.state(), AchievementState::NotAchieved);
    }

    #[test]
    fn test_reported_state_with_unreachable_goal() {
        let mut tracker = GoalTracker::new(2000);
        assert!(tracker.observe(2500));

        tracker.set_goal(0);
        tracker.observe(2500);

        assert_eq!(tracker.state(), AchievementState::AchievedPendingNotice);
        assert_eq!(tracker.reported_state(), AchievementState::NotAchieved);

        tracker.set_goal(2400);
        assert!(!tracker.observe(2500));
        assert_eq!(tracker.reported_state(), AchievementState::AchievedPendingNotice);
    }
}
