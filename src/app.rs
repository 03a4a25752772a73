//! App core for docbatch.
//!
//! [`App`] wires settings to concrete collaborators (object storage and the
//! metadata database). [`UploadSession`] is one hosting view's lifetime:
//! pick, describe, validate, upload, then close or retry what failed.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::database::connection::Database;
use crate::managers::selection_store::{SelectionStore, SelectionStoreTrait};
use crate::platform;
use crate::services::file_picker::{matches_filter, FilePicker};
use crate::services::metadata_store::{MetadataStore, SqliteMetadataStore};
use crate::services::object_storage::{LocalDirStorage, ObjectStorage};
use crate::services::result_aggregator;
use crate::services::upload_orchestrator::{ProgressObserver, UploadOrchestrator};
use crate::services::validation_gate::{self, ValidatedBatch};
use crate::types::config::{HostConfig, StorageBackendKind, UploaderSettings};
use crate::types::errors::{SelectionError, SessionError, ValidationError};
use crate::types::file_item::{FileItem, ItemId, PickedFile};
use crate::types::outcome::{BatchOutcome, UploadReport};
use crate::types::progress::{ItemSnapshot, ItemStatus};

/// Long-lived collaborators shared by every session.
pub struct App {
    pub settings: UploaderSettings,
    pub metadata: Arc<SqliteMetadataStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl App {
    /// Opens the metadata database and the configured storage backend.
    ///
    /// # Arguments
    /// * `settings` - Loaded uploader settings. `metadata.database_path` defaults to
    ///   `<data_dir>/docbatch.db` and `storage.local_root` to `<data_dir>/objects`.
    ///
    /// # Errors
    /// Returns an error if the database directory cannot be created, the database
    /// cannot be opened or migrated, or the storage backend cannot be built.
    pub fn new(settings: UploaderSettings) -> Result<Self, Box<dyn std::error::Error>> {
        let db_path = settings
            .metadata
            .database_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| platform::get_data_dir().join("docbatch.db"));
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Arc::new(Database::open(&db_path)?);
        let storage = Self::build_storage(&settings)?;
        info!(database = %db_path.display(), backend = ?settings.storage.backend, "docbatch ready");

        Ok(Self {
            metadata: Arc::new(SqliteMetadataStore::new(db)),
            storage,
            settings,
        })
    }

    /// Same as `new` but with caller-supplied collaborators.
    pub fn with_collaborators(
        settings: UploaderSettings,
        storage: Arc<dyn ObjectStorage>,
        metadata: Arc<SqliteMetadataStore>,
    ) -> Self {
        Self {
            settings,
            metadata,
            storage,
        }
    }

    fn build_storage(
        settings: &UploaderSettings,
    ) -> Result<Arc<dyn ObjectStorage>, Box<dyn std::error::Error>> {
        match settings.storage.backend {
            StorageBackendKind::Local => {
                let root = settings
                    .storage
                    .local_root
                    .as_ref()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| platform::get_data_dir().join("objects"));
                let mut storage = LocalDirStorage::new(root);
                if let Some(base) = &settings.storage.public_base_url {
                    storage = storage.with_public_base_url(base.clone());
                }
                Ok(Arc::new(storage))
            }
            #[cfg(feature = "http")]
            StorageBackendKind::Http => Ok(Arc::new(
                crate::services::object_storage::HttpObjectStorage::new(&settings.storage)?,
            )),
            #[cfg(not(feature = "http"))]
            StorageBackendKind::Http => Err("http storage backend requires the `http` feature".into()),
        }
    }

    /// Starts a session for one hosting view.
    pub fn open_session(
        &self,
        config: HostConfig,
        observer: Option<Box<dyn ProgressObserver>>,
    ) -> Result<UploadSession, SessionError> {
        let metadata: Arc<dyn MetadataStore> = self.metadata.clone();
        let mut orchestrator = UploadOrchestrator::new(self.storage.clone(), metadata)
            .with_max_concurrency(self.settings.upload.max_concurrent_uploads)
            .with_default_subcategory(self.settings.upload.default_subcategory.clone());
        if let Some(observer) = observer {
            orchestrator = orchestrator.with_observer(observer);
        }
        Ok(UploadSession::new(config, orchestrator)?
            .with_accepted_extensions(self.settings.upload.accepted_extensions.clone()))
    }
}

/// Selection, progress and upload state for one hosting view.
pub struct UploadSession {
    config: HostConfig,
    accepted_extensions: Vec<String>,
    store: SelectionStore,
    orchestrator: UploadOrchestrator,
    last_outcome: Option<BatchOutcome>,
}

impl UploadSession {
    pub fn new(config: HostConfig, orchestrator: UploadOrchestrator) -> Result<Self, SessionError> {
        config.check()?;
        Ok(Self {
            config,
            accepted_extensions: Vec::new(),
            store: SelectionStore::new(),
            orchestrator,
            last_outcome: None,
        })
    }

    /// Restricts `pick` and `add_supplied` to these extensions; empty accepts everything.
    pub fn with_accepted_extensions(mut self, extensions: Vec<String>) -> Self {
        self.accepted_extensions = extensions;
        self
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn last_outcome(&self) -> Option<&BatchOutcome> {
        self.last_outcome.as_ref()
    }

    /// Runs one picker round and appends whatever was chosen.
    pub fn pick(&mut self, picker: &dyn FilePicker) -> Result<Vec<ItemId>, SessionError> {
        let picked = picker.pick(&self.accepted_extensions, self.config.allow_multiple)?;
        self.add_picked(picked)
    }

    pub fn add_picked(&mut self, picked: Vec<PickedFile>) -> Result<Vec<ItemId>, SessionError> {
        let items: Vec<FileItem> = picked.into_iter().map(FileItem::from_picked).collect();
        Ok(self.store.add_items(items)?)
    }

    /// Adds one file supplied directly by the host, subject to the same
    /// extension filter as `pick`.
    pub fn add_supplied(&mut self, picked: PickedFile) -> Result<ItemId, SessionError> {
        if !matches_filter(&picked.name, &self.accepted_extensions) {
            return Err(SelectionError::UnsupportedType(picked.name).into());
        }
        let ids = self.add_picked(vec![picked])?;
        ids.into_iter()
            .next()
            .ok_or_else(|| SelectionError::Cancelled.into())
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Result<(), SessionError> {
        self.store.remove_item(id)?;
        Ok(())
    }

    pub fn describe(&mut self, id: &ItemId, text: &str) -> Result<(), SessionError> {
        Ok(self.store.update_description(id, text)?)
    }

    pub fn snapshot(&self) -> Vec<ItemSnapshot> {
        self.store.snapshot()
    }

    /// Validates the items that have not been uploaded yet.
    pub fn validate(&self) -> Result<ValidatedBatch, Vec<ValidationError>> {
        let pending: Vec<FileItem> = self
            .store
            .items()
            .iter()
            .filter(|item| self.store.status_of(&item.id) == ItemStatus::Pending)
            .cloned()
            .collect();
        validation_gate::validate(&pending)
    }

    /// Validates, uploads every pending item, then aggregates once the loop
    /// has fully completed. Nothing is uploaded if validation fails.
    pub async fn upload(&mut self) -> Result<(UploadReport, BatchOutcome), SessionError> {
        let batch = self.validate().map_err(SessionError::Validation)?;
        let ids = batch.ids().to_vec();

        let report = self.orchestrator.run(batch, &mut self.store, &self.config).await;
        let outcome = result_aggregator::aggregate_entries(&self.store.progress().ordered(&ids));

        self.last_outcome = Some(outcome.clone());
        Ok((report, outcome))
    }

    /// Drops uploaded items and re-queues failed ones as fresh Pending items
    /// (new identities, same file and description), keeping their order.
    pub fn prepare_retry(&mut self) -> Vec<ItemId> {
        self.last_outcome = None;
        self.store.requeue_failed()
    }

    /// Discards the whole selection; used when the hosting view closes.
    pub fn close(&mut self) {
        self.store.reset();
        self.last_outcome = None;
    }
}
