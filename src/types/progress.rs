use serde::{Deserialize, Serialize};

use super::file_item::ItemId;

/// Upload status of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Uploading,
    Success,
    Error,
}

impl ItemStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Success | ItemStatus::Error)
    }

    /// Pending -> Uploading -> {Success, Error}. Re-writing the same
    /// non-terminal status is allowed (progress updates while uploading).
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        match (self, next) {
            (ItemStatus::Pending, ItemStatus::Pending | ItemStatus::Uploading) => true,
            (ItemStatus::Uploading, ItemStatus::Pending) => false,
            (ItemStatus::Uploading, _) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Uploading => "uploading",
            ItemStatus::Success => "success",
            ItemStatus::Error => "error",
        }
    }
}

/// Snapshot of an item's upload progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub status: ItemStatus,
    pub progress_percent: u8,
    pub error_message: Option<String>,
}

impl ProgressEntry {
    pub fn pending() -> Self {
        Self {
            status: ItemStatus::Pending,
            progress_percent: 0,
            error_message: None,
        }
    }

    pub fn uploading(progress_percent: u8) -> Self {
        Self {
            status: ItemStatus::Uploading,
            progress_percent: progress_percent.min(100),
            error_message: None,
        }
    }

    pub fn success() -> Self {
        Self {
            status: ItemStatus::Success,
            progress_percent: 100,
            error_message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ItemStatus::Error,
            progress_percent: 0,
            error_message: Some(message.into()),
        }
    }
}

impl Default for ProgressEntry {
    fn default() -> Self {
        Self::pending()
    }
}

/// Read-only view combining an item's attributes with its progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub display_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub description: String,
    pub status: ItemStatus,
    pub progress_percent: u8,
    pub error_message: Option<String>,
}
