//! Calculation history with a 50-entry cap.
//!
//! The store loads its snapshot once at construction, keeps entries newest
//! first in memory and rewrites the whole snapshot after every mutation.
//! Storage failures never escape. They are logged and reported through
//! `last_save_succeeded`, while the in-memory state carries on.

use crate::{
    CalculationInput, CalculationResult, CalculatorKind, Clock, HistoryEntry, Recordable,
    Storage, SystemClock,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Well-known key the snapshot is stored under
pub const STORAGE_KEY: &str = "medical-calculator-history";

/// Most entries kept; the oldest is dropped on overflow
pub const MAX_ENTRIES: usize = 50;

const ID_SUFFIX_LEN: usize = 9;

/// Append-only, capacity-bounded log of saved calculations
pub struct HistoryStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    entries: Vec<HistoryEntry>,
    last_save_ok: bool,
}

impl<S: Storage> HistoryStore<S, SystemClock> {
    /// Open the history stored in `storage`, stamping entries with the system clock
    pub fn open(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: Storage, C: Clock> HistoryStore<S, C> {
    /// Open the history stored in `storage` with an explicit clock
    pub fn with_clock(storage: S, clock: C) -> Self {
        let entries = load_entries(&storage);
        Self {
            storage,
            clock,
            entries,
            last_save_ok: true,
        }
    }

    /// Current entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Record a calculation and persist the new snapshot
    pub fn add(
        &mut self,
        calculator_type: CalculatorKind,
        calculator_name: impl Into<String>,
        inputs: CalculationInput,
        result: CalculationResult,
    ) -> HistoryEntry {
        let timestamp = self.clock.now();
        let entry = HistoryEntry {
            id: generate_id(&self.entries, timestamp),
            calculator_type,
            calculator_name: calculator_name.into(),
            inputs,
            result,
            timestamp,
        };

        self.entries.insert(0, entry.clone());
        if self.entries.len() > MAX_ENTRIES {
            let evicted = self.entries.len() - MAX_ENTRIES;
            self.entries.truncate(MAX_ENTRIES);
            tracing::debug!("Evicted {} oldest history entries", evicted);
        }

        tracing::info!("Saved {} calculation {}", calculator_type, entry.id);
        self.persist();
        entry
    }

    /// Record a calculator output using its own inputs and result
    pub fn record(&mut self, output: &impl Recordable) -> HistoryEntry {
        self.add(
            output.calculator(),
            output.calculator_name(),
            output.inputs(),
            output.result(),
        )
    }

    /// Remove an entry; unknown ids are ignored
    pub fn remove(&mut self, id: &str) {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            tracing::debug!("No history entry {} to remove", id);
        } else {
            tracing::info!("Removed history entry {}", id);
        }
        self.persist();
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        tracing::info!("Clearing {} history entries", self.entries.len());
        self.entries.clear();
        self.persist();
    }

    /// Entries produced by one calculator, in stored order
    pub fn query_by_type(&self, calculator_type: CalculatorKind) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.calculator_type == calculator_type)
            .collect()
    }

    /// How long ago an entry was saved, e.g. "5 minutes ago"
    pub fn describe_age(&self, entry: &HistoryEntry) -> String {
        format_age(entry.timestamp, self.clock.now())
    }

    /// Whether the most recent mutation reached storage
    ///
    /// `false` means the current entries exist in memory only.
    pub fn last_save_succeeded(&self) -> bool {
        self.last_save_ok
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage, e.g. to reopen it
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let snapshot = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize history: {}. Keeping in memory only.", e);
                self.last_save_ok = false;
                return;
            }
        };

        self.last_save_ok = match self.storage.set_item(STORAGE_KEY, &snapshot) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save history: {}. Keeping in memory only.", e);
                false
            }
        };
    }
}

/// Read the stored snapshot, falling back to an empty history
fn load_entries<S: Storage>(storage: &S) -> Vec<HistoryEntry> {
    let contents = match storage.get_item(STORAGE_KEY) {
        Ok(Some(contents)) => contents,
        Ok(None) => {
            tracing::info!("No saved history found, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Unable to read saved history: {}. Starting empty.", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<HistoryEntry>>(&contents) {
        Ok(mut entries) => {
            let mut seen = HashSet::new();
            entries.retain(|e| seen.insert(e.id.clone()));
            entries.truncate(MAX_ENTRIES);
            tracing::debug!("Loaded {} history entries", entries.len());
            entries
        }
        Err(e) => {
            tracing::warn!("Failed to parse saved history: {}. Starting empty.", e);
            Vec::new()
        }
    }
}

/// `<epoch millis>-<random suffix>`, distinct from every id in `existing`
fn generate_id(existing: &[HistoryEntry], now: DateTime<Utc>) -> String {
    loop {
        let suffix = Uuid::new_v4().simple().to_string();
        let id = format!("{}-{}", now.timestamp_millis(), &suffix[..ID_SUFFIX_LEN]);
        if !existing.iter().any(|e| e.id == id) {
            return id;
        }
    }
}

/// Coarse relative age between two instants
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    fn plural(n: i64, unit: &str) -> String {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    }

    if minutes < 1 {
        "just now".into()
    } else if hours < 1 {
        plural(minutes, "minute")
    } else if days < 1 {
        plural(hours, "hour")
    } else {
        plural(days, "day")
    }
}
