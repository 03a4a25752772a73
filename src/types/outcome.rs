use serde::{Deserialize, Serialize};

use super::file_item::ItemId;
use super::progress::ItemStatus;

/// How a single item settled during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub id: ItemId,
    pub display_name: String,
    pub status: ItemStatus,
    pub storage_key: Option<String>,
    pub public_url: Option<String>,
    pub record_id: Option<String>,
    pub error_message: Option<String>,
}

/// Per-item outcomes of one orchestrator run, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    pub items: Vec<ItemOutcome>,
}

impl UploadReport {
    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|o| o.status == ItemStatus::Success)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|o| o.status == ItemStatus::Error)
            .count()
    }
}

/// Terminal signal for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchOutcome {
    BatchSuccess {
        uploaded: usize,
    },
    BatchPartialFailure {
        failed_ids: Vec<ItemId>,
        messages: Vec<String>,
    },
}

impl BatchOutcome {
    pub fn has_errors(&self) -> bool {
        matches!(self, BatchOutcome::BatchPartialFailure { .. })
    }
}
