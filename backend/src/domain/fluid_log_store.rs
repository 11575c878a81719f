//! In-memory log of a user's drinks.
//!
//! Entries are kept in the order they were logged, which is not necessarily
//! the order of their display times: a user may log a drink they had earlier.
//! Totals are recomputed on every query; a day holds at most a few hundred
//! entries.

use std::collections::HashMap;

use chrono::Utc;
use shared::{
    EditLogRequest, FluidLog, FluidType, FluidTypeTotal, LogDrinkRequest, ALL_FLUID_TYPES,
};
use tracing::debug;

/// Ordered collection of one user's fluid log entries
#[derive(Debug, Clone, Default)]
pub struct FluidLogStore {
    entries: Vec<FluidLog>,
    last_id: u64,
}

impl FluidLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted entries.
    ///
    /// Entries whose id was already seen are dropped, so the id stays unique.
    pub fn restore(entries: Vec<FluidLog>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            if store.get(entry.id).is_some() {
                debug!("Dropping duplicate fluid log id {}", entry.id);
                continue;
            }
            store.last_id = store.last_id.max(entry.id);
            store.entries.push(entry);
        }
        store
    }

    /// Append a newly logged drink and return it with its assigned id
    pub fn append(&mut self, request: LogDrinkRequest) -> FluidLog {
        let entry = FluidLog {
            id: self.next_id(),
            fluid_type: request.fluid_type,
            time: request.time,
            amount_ml: request.amount_ml,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Replace the fields of an existing entry, keeping its id.
    ///
    /// Returns false and leaves the log untouched when no entry has that id.
    pub fn update(&mut self, request: EditLogRequest) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == request.id) {
            Some(entry) => {
                entry.fluid_type = request.fluid_type;
                entry.time = request.time;
                entry.amount_ml = request.amount_ml;
                true
            }
            None => false,
        }
    }

    /// Remove an entry; returns the removed entry, or None when absent
    pub fn remove(&mut self, id: u64) -> Option<FluidLog> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: u64) -> Option<&FluidLog> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Sum of all logged amounts in milliliters
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.amount_ml)).sum()
    }

    /// The last `n` entries logged, oldest of them first
    pub fn recent(&self, n: usize) -> &[FluidLog] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Full history, most recently logged first
    pub fn history(&self) -> impl Iterator<Item = &FluidLog> {
        self.entries.iter().rev()
    }

    /// All entries in logging order
    pub fn entries(&self) -> &[FluidLog] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Intake per fluid type in catalog order, skipping fluids never logged
    pub fn totals_by_type(&self) -> Vec<FluidTypeTotal> {
        let mut totals: HashMap<FluidType, u64> = HashMap::new();
        for entry in &self.entries {
            *totals.entry(entry.fluid_type).or_default() += u64::from(entry.amount_ml);
        }

        ALL_FLUID_TYPES
            .iter()
            .filter_map(|fluid| {
                totals.get(fluid).map(|amount_ml| FluidTypeTotal {
                    fluid_type: *fluid,
                    amount_ml: *amount_ml,
                })
            })
            .collect()
    }

    // Clock-based, but never reuses or goes below a previous id
    fn next_id(&mut self) -> u64 {
        let now_millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last_id = now_millis.max(self.last_id + 1);
        self.last_id
    }
}
