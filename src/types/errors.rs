use std::fmt;

use super::file_item::ItemId;
use super::progress::ItemStatus;

// === SelectionError ===

/// Errors reported by the picker collaborator. The batch is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The user dismissed the picker or selected nothing.
    Cancelled,
    /// The picker itself failed.
    PickerFailed(String),
    /// The picked file's type is not in the accepted list.
    UnsupportedType(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::Cancelled => write!(f, "Selection cancelled"),
            SelectionError::PickerFailed(msg) => write!(f, "File picker failed: {}", msg),
            SelectionError::UnsupportedType(name) => {
                write!(f, "Unsupported file type: {}", name)
            }
        }
    }
}

impl std::error::Error for SelectionError {}

// === StoreError ===

/// Errors related to selection list operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No item with the given identity is selected.
    NotFound(ItemId),
    /// The item has left the Pending state and can no longer be edited.
    NotPending(ItemId),
    /// An item was offered with an empty display name.
    EmptyDisplayName,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Item not found: {}", id),
            StoreError::NotPending(id) => write!(f, "Item is no longer pending: {}", id),
            StoreError::EmptyDisplayName => write!(f, "Item display name must not be empty"),
        }
    }
}

impl std::error::Error for StoreError {}

// === ValidationError ===

/// A reason the batch may not start uploading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The batch has no items.
    EmptyBatch,
    /// The item's description is empty after trimming.
    MissingDescription(ItemId),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyBatch => write!(f, "No files selected"),
            ValidationError::MissingDescription(id) => {
                write!(f, "Missing description for item: {}", id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// === TransportError ===

/// Errors from the storage-write collaborator. Isolated to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The file's bytes could not be read from its handle.
    Read(String),
    /// The request never produced a response.
    Network(String),
    /// The storage backend answered with an error.
    Rejected { status: u16, message: String },
}

impl TransportError {
    /// The collaborator's own message, without a category prefix.
    pub fn detail(&self) -> &str {
        match self {
            TransportError::Read(msg)
            | TransportError::Network(msg)
            | TransportError::Rejected { message: msg, .. } => msg,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Read(msg) => write!(f, "Failed to read file: {}", msg),
            TransportError::Network(msg) => write!(f, "Storage network error: {}", msg),
            TransportError::Rejected { status, message } => {
                write!(f, "Storage rejected upload ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for TransportError {}

// === PersistenceError ===

/// Errors from the metadata collaborator after a successful storage write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Database operation failed.
    Database(String),
    /// The metadata backend refused the record.
    Rejected(String),
}

impl PersistenceError {
    pub fn detail(&self) -> &str {
        match self {
            PersistenceError::Database(msg) | PersistenceError::Rejected(msg) => msg,
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Database(msg) => write!(f, "Metadata database error: {}", msg),
            PersistenceError::Rejected(msg) => write!(f, "Metadata record rejected: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}

// === ProgressError ===

/// Errors related to progress tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    /// The write would move an item backwards in its lifecycle.
    InvalidTransition {
        id: ItemId,
        from: ItemStatus,
        to: ItemStatus,
    },
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressError::InvalidTransition { id, from, to } => write!(
                f,
                "Invalid status transition for {}: {} -> {}",
                id,
                from.as_str(),
                to.as_str()
            ),
        }
    }
}

impl std::error::Error for ProgressError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === SessionError ===

/// Errors surfaced by an upload session to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The host configuration is unusable.
    InvalidConfig(String),
    /// The batch failed validation; nothing was uploaded.
    Validation(Vec<ValidationError>),
    /// A selection list operation failed.
    Store(StoreError),
    /// The picker failed or was cancelled.
    Selection(SelectionError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidConfig(msg) => write!(f, "Invalid host configuration: {}", msg),
            SessionError::Validation(violations) => {
                let joined: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                write!(f, "Batch is not ready: {}", joined.join("; "))
            }
            SessionError::Store(e) => write!(f, "{}", e),
            SessionError::Selection(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        SessionError::Store(e)
    }
}

impl From<SelectionError> for SessionError {
    fn from(e: SelectionError) -> Self {
        SessionError::Selection(e)
    }
}
