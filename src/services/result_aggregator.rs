//! Terminal signal for a finished batch.
//!
//! Called only after `UploadOrchestrator::run` has returned, so every item
//! it read has settled.

use crate::managers::selection_store::{SelectionStore, SelectionStoreTrait};
use crate::types::file_item::ItemId;
use crate::types::outcome::BatchOutcome;
use crate::types::progress::{ItemStatus, ProgressEntry};

/// Summarises ordered progress entries.
pub fn aggregate_entries(entries: &[(ItemId, ProgressEntry)]) -> BatchOutcome {
    let (failed_ids, messages): (Vec<ItemId>, Vec<String>) = entries
        .iter()
        .filter(|(_, entry)| entry.status == ItemStatus::Error)
        .map(|(id, entry)| (*id, entry.error_message.clone().unwrap_or_default()))
        .unzip();

    if failed_ids.is_empty() {
        BatchOutcome::BatchSuccess {
            uploaded: entries
                .iter()
                .filter(|(_, entry)| entry.status == ItemStatus::Success)
                .count(),
        }
    } else {
        BatchOutcome::BatchPartialFailure {
            failed_ids,
            messages,
        }
    }
}

/// Summarises the store's progress in selection order.
pub fn aggregate(store: &SelectionStore) -> BatchOutcome {
    aggregate_entries(&store.progress().ordered(&store.item_ids()))
}
