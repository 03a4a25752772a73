//! Ordered list of files selected for one upload session.
//!
//! Owns every `FileItem` and the `ProgressTracker` that follows them, so
//! removing an item always drops its progress entry as well.

use crate::managers::progress_tracker::ProgressTracker;
use crate::types::errors::StoreError;
use crate::types::file_item::{FileItem, ItemId};
use crate::types::progress::{ItemSnapshot, ItemStatus};

/// Trait defining selection list operations.
pub trait SelectionStoreTrait {
    fn add_items(&mut self, new_items: Vec<FileItem>) -> Result<Vec<ItemId>, StoreError>;
    fn remove_item(&mut self, id: &ItemId) -> Result<FileItem, StoreError>;
    fn update_description(&mut self, id: &ItemId, text: &str) -> Result<(), StoreError>;
    fn reset(&mut self);
    fn get_item(&self, id: &ItemId) -> Option<&FileItem>;
    fn items(&self) -> &[FileItem];
    fn item_ids(&self) -> Vec<ItemId>;
    fn snapshot(&self) -> Vec<ItemSnapshot>;
}

/// In-memory selection store.
#[derive(Debug, Default)]
pub struct SelectionStore {
    items: Vec<FileItem>,
    progress: ProgressTracker,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressTracker {
        &mut self.progress
    }

    pub fn status_of(&self, id: &ItemId) -> ItemStatus {
        self.progress.status(id)
    }

    /// Drops uploaded items and re-creates failed ones as fresh Pending items
    /// (new identity, same file and description). Order is kept; items that
    /// never started stay as they are. Returns the identities now selected.
    pub fn requeue_failed(&mut self) -> Vec<ItemId> {
        let progress = &self.progress;
        let items = std::mem::take(&mut self.items);
        self.items = items
            .into_iter()
            .filter(|item| progress.status(&item.id) != ItemStatus::Success)
            .map(|item| match progress.status(&item.id) {
                ItemStatus::Error => item.renewed(),
                _ => item,
            })
            .collect();
        self.progress.clear();
        self.item_ids()
    }

    fn find_index(&self, id: &ItemId) -> Result<usize, StoreError> {
        self.items
            .iter()
            .position(|item| item.id == *id)
            .ok_or(StoreError::NotFound(*id))
    }
}

impl SelectionStoreTrait for SelectionStore {
    /// Appends in the given order after everything already selected.
    /// Duplicates are kept; each item keeps its own identity.
    fn add_items(&mut self, new_items: Vec<FileItem>) -> Result<Vec<ItemId>, StoreError> {
        if new_items.iter().any(|item| item.display_name.is_empty()) {
            return Err(StoreError::EmptyDisplayName);
        }
        let ids = new_items.iter().map(|item| item.id).collect();
        self.items.extend(new_items);
        Ok(ids)
    }

    /// Removes the item and its progress entry. Items being uploaded cannot
    /// be reached here: the orchestrator holds the store exclusively for the
    /// whole run.
    fn remove_item(&mut self, id: &ItemId) -> Result<FileItem, StoreError> {
        let idx = self.find_index(id)?;
        self.progress.remove(id);
        Ok(self.items.remove(idx))
    }

    fn update_description(&mut self, id: &ItemId, text: &str) -> Result<(), StoreError> {
        let idx = self.find_index(id)?;
        if self.progress.status(id) != ItemStatus::Pending {
            return Err(StoreError::NotPending(*id));
        }
        self.items[idx].description = text.to_string();
        Ok(())
    }

    fn reset(&mut self) {
        self.items.clear();
        self.progress.clear();
    }

    fn get_item(&self, id: &ItemId) -> Option<&FileItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    fn items(&self) -> &[FileItem] {
        &self.items
    }

    fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    fn snapshot(&self) -> Vec<ItemSnapshot> {
        self.items
            .iter()
            .map(|item| {
                let entry = self.progress.get(&item.id).cloned().unwrap_or_default();
                ItemSnapshot {
                    id: item.id,
                    display_name: item.display_name.clone(),
                    size_bytes: item.size_bytes,
                    mime_type: item.mime_type.clone(),
                    description: item.description.clone(),
                    status: entry.status,
                    progress_percent: entry.progress_percent,
                    error_message: entry.error_message,
                }
            })
            .collect()
    }
}
