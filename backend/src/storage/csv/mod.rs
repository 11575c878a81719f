//! # File Storage Module
//!
//! File-based storage: one directory per user under a common base directory,
//! holding the fluid log as CSV and preferences as YAML.
//!
//! ```text
//! data/
//! └── {username}/
//!     ├── preferences.yaml
//!     └── fluid_logs.csv
//! ```

pub mod connection;
pub mod fluid_log_repository;
pub mod preferences_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use fluid_log_repository::FluidLogRepository;
pub use preferences_repository::YamlPreferencesStore;
