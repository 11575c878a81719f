//! # Fluid Check Backend
//!
//! Core of the Fluid Check hydration tracker: the drink log, daily goal and
//! achievement tracking, and the interfaces to preference storage and the
//! hydration coach. UI layers drive it through a [`HydrationSession`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use fluid_check_backend::{CoreConfig, HydrationSession, OfflineCoach, SessionServices};
//! use shared::{FluidType, LogDrinkRequest};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = CoreConfig::load()?;
//! fluid_check_backend::logging::init_tracing(&config.log_filter);
//!
//! let services = SessionServices::with_file_storage(&config, Arc::new(OfflineCoach))?;
//! let mut session = HydrationSession::start("ana", services).await?;
//! let outcome = session
//!     .log_drink(LogDrinkRequest {
//!         fluid_type: FluidType::Water,
//!         time: "08:00 AM".to_string(),
//!         amount_ml: 250,
//!     })
//!     .await?;
//! println!("{} ml of {} ml", outcome.snapshot.total_ml, outcome.snapshot.goal_ml);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod storage;

pub use config::CoreConfig;
pub use domain::{
    CoachError, CoachService, FluidLogStore, GoalTracker, HydrationCoachClient, HydrationSession,
    InputError, OfflineCoach, SessionServices, UnsavedLogError,
};
