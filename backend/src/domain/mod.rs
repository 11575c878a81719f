//! # Domain Module
//!
//! Hydration tracking logic, independent of how data is stored.
//!
//! - **fluid_log_store**: ordered drink log and its totals
//! - **goal_tracker**: daily goal, progress and the achievement state machine
//! - **coach**: contract with the hydration coach and its fallbacks
//! - **input**: parsing of numeric text at the UI boundary
//! - **session**: one signed-in user's state, tying the above together

pub mod coach;
pub mod fluid_log_store;
pub mod goal_tracker;
pub mod input;
pub mod session;

pub use coach::{CoachError, CoachService, HydrationCoachClient, OfflineCoach};
pub use fluid_log_store::FluidLogStore;
pub use goal_tracker::GoalTracker;
pub use input::{extract_digits, parse_amount_text, parse_goal_text, InputError};
pub use session::{HydrationSession, SessionServices, UnsavedLogError};
