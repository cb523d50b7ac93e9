//! Bounded, most-recent-first history of completed executions.
//!
//! Only the N newest entries are kept; recording past capacity evicts the
//! oldest. Nothing here is persisted, the history lives and dies with the
//! owning compiler state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::execution::ExecutionResponse;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub code: String,
    pub language: String,
    pub version: String,
    pub output: ExecutionResponse,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry with a fresh random id, stamped now
    pub fn new(
        code: impl Into<String>,
        language: impl Into<String>,
        version: impl Into<String>,
        output: ExecutionResponse,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: code.into(),
            language: language.into(),
            version: version.into(),
            output,
            timestamp: Utc::now(),
        }
    }

    /// ISO-8601 rendering of the timestamp
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339()
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionHistory {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for ExecutionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ExecutionHistory {
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > self.max_entries {
            if let Some(evicted) = self.entries.pop_back() {
                log::debug!("Evicted history entry {}", evicted.id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns whether an entry with `id` was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}
