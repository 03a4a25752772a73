//! Per-item upload progress, keyed by item identity.
//!
//! Written only by the orchestrator; read by the host through snapshots.
//! An item with no entry has not started and is implicitly Pending.

use std::collections::HashMap;

use crate::types::errors::ProgressError;
use crate::types::file_item::ItemId;
use crate::types::progress::{ItemStatus, ProgressEntry};

#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: HashMap<ItemId, ProgressEntry>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ItemId) -> Option<&ProgressEntry> {
        self.entries.get(id)
    }

    pub fn status(&self, id: &ItemId) -> ItemStatus {
        self.entries
            .get(id)
            .map(|e| e.status)
            .unwrap_or(ItemStatus::Pending)
    }

    /// Replaces the entry for `id`, refusing writes that move it backwards.
    pub fn record(&mut self, id: ItemId, entry: ProgressEntry) -> Result<(), ProgressError> {
        let current = self.status(&id);
        if !current.can_transition_to(entry.status) {
            return Err(ProgressError::InvalidTransition {
                id,
                from: current,
                to: entry.status,
            });
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<ProgressEntry> {
        self.entries.remove(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries for `order`, in that order, with Pending filled in for items
    /// that have not started.
    pub fn ordered(&self, order: &[ItemId]) -> Vec<(ItemId, ProgressEntry)> {
        order
            .iter()
            .map(|id| (*id, self.entries.get(id).cloned().unwrap_or_default()))
            .collect()
    }
}
