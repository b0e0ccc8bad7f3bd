//! Recent predictions: a bounded, newest-first log of trade plans.

use serde::{Deserialize, Serialize};

use crate::domain::TradePlan;

/// Maximum number of plans kept.
pub const HISTORY_CAPACITY: usize = 5;

/// Newest-first log of at most [`HISTORY_CAPACITY`] plans.
///
/// The oldest entry is evicted from the tail on overflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<TradePlan>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from stored entries, keeping the capacity bound.
    pub fn from_entries(mut entries: Vec<TradePlan>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }

    /// Return a new log with `plan` first.
    pub fn append(mut self, plan: TradePlan) -> Self {
        self.push(plan);
        self
    }

    /// In-place variant of [`append`](Self::append) with the same contract.
    pub fn push(&mut self, plan: TradePlan) {
        self.entries.insert(0, plan);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn entries(&self) -> &[TradePlan] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&TradePlan> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradePlan> {
        self.entries.iter()
    }
}
