use serde::{Deserialize, Serialize};

use super::errors::SessionError;

/// Subcategory recorded when the host does not supply one.
pub const DEFAULT_SUBCATEGORY: &str = "general";

/// Per-session options supplied by the hosting view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Partitions storage keys and metadata records.
    pub category: String,
    /// Secondary metadata tag.
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Allows picking more than one file per selection round.
    #[serde(default)]
    pub allow_multiple: bool,
    /// Attributed as both author and uploader in every metadata record.
    pub uploader_identity: String,
}

impl HostConfig {
    pub fn new(
        category: &str,
        subcategory: Option<&str>,
        allow_multiple: bool,
        uploader_identity: &str,
    ) -> Result<Self, SessionError> {
        let config = Self {
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            allow_multiple,
            uploader_identity: uploader_identity.to_string(),
        };
        config.check()?;
        Ok(config)
    }

    /// Rejects an empty category or uploader identity.
    pub fn check(&self) -> Result<(), SessionError> {
        if self.category.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "category must not be empty".to_string(),
            ));
        }
        if self.uploader_identity.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "uploader identity must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The subcategory to record, falling back to `default` when absent or blank.
    pub fn subcategory_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.subcategory.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => default,
        }
    }
}

/// Top-level uploader settings persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UploaderSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub metadata: MetadataSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which storage collaborator to write objects through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    Http,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub backend: StorageBackendKind,
    pub endpoint: String,
    pub bucket: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Root directory for the local backend; defaults to `<data_dir>/objects`.
    #[serde(default)]
    pub local_root: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Local,
            endpoint: "http://localhost:54321/storage/v1".to_string(),
            bucket: "documents".to_string(),
            api_key: None,
            public_base_url: None,
            local_root: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetadataSettings {
    /// SQLite file; defaults to `<data_dir>/docbatch.db`.
    #[serde(default)]
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadSettings {
    pub max_concurrent_uploads: usize,
    pub default_subcategory: String,
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_concurrent_uploads: 1,
            default_subcategory: DEFAULT_SUBCATEGORY.to_string(),
            accepted_extensions: [
                "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "csv", "png", "jpg",
                "jpeg",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
