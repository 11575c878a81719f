/// Test utilities with automatic cleanup of on-disk test data.
///
/// The temporary directory is removed when the environment is dropped, even
/// if the test panics.
use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};

use super::connection::CsvConnection;
use super::fluid_log_repository::FluidLogRepository;
use super::preferences_repository::YamlPreferencesStore;

/// RAII test environment backed by a fresh temp directory
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        Self::from_temp_dir(TempDir::new()?)
    }

    /// Same as [`new`](Self::new) with a recognizable directory prefix
    pub async fn new_with_prefix(prefix: &str) -> Result<Self> {
        Self::from_temp_dir(Builder::new().prefix(prefix).tempdir()?)
    }

    fn from_temp_dir(temp_dir: TempDir) -> Result<Self> {
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    pub fn fluid_log_repository(&self) -> FluidLogRepository {
        FluidLogRepository::new(self.connection.clone())
    }

    pub fn preferences_store(&self) -> YamlPreferencesStore {
        YamlPreferencesStore::new(self.connection.clone())
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("FLUID_CHECK_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}
