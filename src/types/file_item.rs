use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a selected file. Never derived from the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(input: &str) -> Option<Self> {
        Uuid::parse_str(input).ok().map(Self)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a picked file's bytes.
///
/// The core never inspects it; it is only read when the storage write for
/// the owning item begins.
#[derive(Debug, Clone)]
pub enum FileHandle {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

impl FileHandle {
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileHandle::Path(path) => tokio::fs::read(path).await,
            FileHandle::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// One entry returned by a picker.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub handle: FileHandle,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// A selected file plus its user-supplied description.
///
/// Upload status is tracked separately, keyed by `id`.
#[derive(Debug, Clone)]
pub struct FileItem {
    pub id: ItemId,
    pub display_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub description: String,
    pub handle: FileHandle,
}

impl FileItem {
    pub fn from_picked(picked: PickedFile) -> Self {
        Self {
            id: ItemId::new(),
            display_name: picked.name,
            size_bytes: picked.size,
            mime_type: picked.mime_type,
            description: String::new(),
            handle: picked.handle,
        }
    }

    /// Same file and description under a fresh identity.
    pub fn renewed(&self) -> Self {
        Self {
            id: ItemId::new(),
            ..self.clone()
        }
    }

    /// Substring after the last `.` of the display name, if any.
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.display_name)
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Returns the substring after the last `.` in `name`, or `None` when the
/// name has no dot or ends with one.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Formats a byte count as megabytes with one decimal place.
pub fn format_size_label(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
