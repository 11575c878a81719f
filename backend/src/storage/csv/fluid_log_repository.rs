//! # CSV Fluid Log Repository
//!
//! Stores each user's fluid log in `{user_directory}/fluid_logs.csv`.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! └── {username}/
//!     ├── preferences.yaml
//!     └── fluid_logs.csv    <- This module manages these files
//! ```
//!
//! ## CSV Format
//!
//! ```csv
//! id,fluid_type,time,amount_ml
//! 1737367200000,Water,08:00 AM,250
//! 1737370800000,Hot chocolate,09:00 AM,200
//! ```
//!
//! Rows are kept in logging order. The whole file is rewritten through a
//! temp file and a rename on every save.

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use shared::{FluidLog, FluidType};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{debug, warn};

use super::connection::CsvConnection;
use crate::storage::traits::FluidLogStorage;

const FLUID_LOGS_FILE: &str = "fluid_logs.csv";

/// CSV record structure for fluid logs
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FluidLogRecord {
    id: u64,
    fluid_type: String,
    time: String,
    amount_ml: u32,
}

impl From<&FluidLog> for FluidLogRecord {
    fn from(entry: &FluidLog) -> Self {
        FluidLogRecord {
            id: entry.id,
            fluid_type: entry.fluid_type.display_name().to_string(),
            time: entry.time.clone(),
            amount_ml: entry.amount_ml,
        }
    }
}

impl From<FluidLogRecord> for FluidLog {
    fn from(record: FluidLogRecord) -> Self {
        FluidLog {
            id: record.id,
            fluid_type: FluidType::from_display_name(&record.fluid_type),
            time: record.time,
            amount_ml: record.amount_ml,
        }
    }
}

/// File-backed [`FluidLogStorage`]
#[derive(Debug, Clone)]
pub struct FluidLogRepository {
    connection: CsvConnection,
}

impl FluidLogRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn logs_file_path(&self, username: &str) -> PathBuf {
        self.connection.user_directory(username).join(FLUID_LOGS_FILE)
    }

    fn read_logs(&self, username: &str) -> Result<Vec<FluidLog>> {
        let path = self.logs_file_path(username);
        if !path.exists() {
            debug!("No fluid log file for {} yet", username);
            return Ok(Vec::new());
        }

        let file = File::open(&path)
            .with_context(|| format!("Failed to open fluid log file {}", path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut logs = Vec::new();
        for result in csv_reader.deserialize::<FluidLogRecord>() {
            match result {
                Ok(record) => logs.push(FluidLog::from(record)),
                Err(e) => {
                    warn!("Failed to parse fluid log record in {}: {}. Skipping.", path.display(), e);
                }
            }
        }

        debug!("Loaded {} fluid logs for {}", logs.len(), username);
        Ok(logs)
    }

    fn write_logs(&self, username: &str, logs: &[FluidLog]) -> Result<()> {
        self.connection.ensure_user_directory(username)?;
        let path = self.logs_file_path(username);
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)
                .with_context(|| format!("Failed to create {}", temp_path.display()))?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));

            if logs.is_empty() {
                csv_writer.write_record(["id", "fluid_type", "time", "amount_ml"])?;
            }
            for entry in logs {
                csv_writer.serialize(FluidLogRecord::from(entry))?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} fluid logs to {}", logs.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl FluidLogStorage for FluidLogRepository {
    async fn load_logs(&self, username: &str) -> Result<Vec<FluidLog>> {
        self.read_logs(username)
    }

    async fn save_logs(&self, username: &str, logs: &[FluidLog]) -> Result<()> {
        self.write_logs(username, logs)
    }
}
