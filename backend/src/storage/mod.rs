//! # Storage Module
//!
//! Persistence behind narrow traits so the domain layer never knows the
//! medium.
//!
//! - **traits**: `PreferencesStore` (per-user key-value with a change stream)
//!   and `FluidLogStorage`
//! - **user_preferences**: typed profile/goal/setup access over any store
//! - **memory**: in-process backends
//! - **csv**: file backends (CSV logs, YAML preferences)

pub mod csv;
pub mod memory;
pub mod traits;
pub mod user_preferences;

pub use csv::{CsvConnection, FluidLogRepository, YamlPreferencesStore};
pub use memory::{MemoryFluidLogStorage, MemoryPreferencesStore};
pub use traits::{FluidLogStorage, PreferenceChange, PreferenceKey, PreferenceValue, PreferencesStore};
pub use user_preferences::UserPreferences;
