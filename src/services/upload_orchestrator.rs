//! Upload loop for a validated batch.
//!
//! For every item, in selection order: mark it Uploading, derive a storage
//! key, write the bytes through [`ObjectStorage`], then insert a metadata
//! record through [`MetadataStore`]. A failure at either step marks that one
//! item Error and the loop moves on; nothing escapes `run` except the report.
//!
//! Items are taken in windows of `max_concurrency` (default 1, i.e. strictly
//! sequential). Uploads inside a window are polled together on the calling
//! task and their results are applied in selection order, so the progress
//! tracker keeps a single writer.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::managers::selection_store::{SelectionStore, SelectionStoreTrait};
use crate::services::metadata_store::MetadataStore;
use crate::services::object_storage::ObjectStorage;
use crate::services::storage_key::StorageKeyGenerator;
use crate::services::validation_gate::ValidatedBatch;
use crate::types::config::{HostConfig, DEFAULT_SUBCATEGORY};
use crate::types::errors::TransportError;
use crate::types::file_item::{format_size_label, FileItem, ItemId};
use crate::types::outcome::{ItemOutcome, UploadReport};
use crate::types::progress::{ItemStatus, ProgressEntry};
use crate::types::record::DocumentRecord;

/// Receives every progress write as it happens.
pub trait ProgressObserver {
    fn on_progress(&self, id: &ItemId, entry: &ProgressEntry);
}

/// Builds the metadata record for an item written to `url`.
pub fn build_record(
    item: &FileItem,
    url: &str,
    config: &HostConfig,
    default_subcategory: &str,
) -> DocumentRecord {
    let description = item.description.trim().to_string();
    DocumentRecord {
        name: item.display_name.clone(),
        doc_type: item.extension().unwrap_or_default().to_uppercase(),
        size_label: format_size_label(item.size_bytes),
        keywords: description.clone(),
        description,
        url: url.to_string(),
        category: config.category.clone(),
        subcategory: config.subcategory_or(default_subcategory).to_string(),
        author_id: config.uploader_identity.clone(),
        uploaded_by_id: config.uploader_identity.clone(),
    }
}

/// Result of the two collaborator steps for one item.
struct Settled {
    storage_key: Option<String>,
    public_url: Option<String>,
    record_id: Option<String>,
    error: Option<String>,
}

pub struct UploadOrchestrator {
    storage: Arc<dyn ObjectStorage>,
    metadata: Arc<dyn MetadataStore>,
    keys: StorageKeyGenerator,
    max_concurrency: usize,
    default_subcategory: String,
    observer: Option<Box<dyn ProgressObserver>>,
}

impl UploadOrchestrator {
    pub fn new(storage: Arc<dyn ObjectStorage>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self {
            storage,
            metadata,
            keys: StorageKeyGenerator::new(),
            max_concurrency: 1,
            default_subcategory: DEFAULT_SUBCATEGORY.to_string(),
            observer: None,
        }
    }

    /// Upper bound on uploads in flight at once. Values below 1 are raised to 1.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_default_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.default_subcategory = subcategory.into();
        self
    }

    pub fn with_key_generator(mut self, keys: StorageKeyGenerator) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Uploads every item of `batch` and returns once all of them have
    /// settled. Per-item failures are recorded, never returned.
    pub async fn run(
        &self,
        batch: ValidatedBatch,
        store: &mut SelectionStore,
        config: &HostConfig,
    ) -> UploadReport {
        info!(
            items = batch.len(),
            category = %config.category,
            concurrency = self.max_concurrency,
            "starting batch upload"
        );
        let mut report = UploadReport::default();

        for window in batch.ids().chunks(self.max_concurrency) {
            let mut items = Vec::with_capacity(window.len());
            for id in window {
                let Some(item) = store.get_item(id).cloned() else {
                    warn!(item = %id, "item left the selection before upload, skipping");
                    continue;
                };
                if store.status_of(id) != ItemStatus::Pending {
                    warn!(item = %id, "item already processed, skipping");
                    continue;
                }
                if !item.has_description() {
                    warn!(item = %id, "description cleared after validation, skipping");
                    continue;
                }
                self.apply(store, item.id, ProgressEntry::uploading(0));
                items.push(item);
            }

            let results = join_all(items.iter().map(|item| self.upload_one(item, config))).await;

            for (item, settled) in items.iter().zip(results) {
                let entry = match &settled.error {
                    Some(message) => ProgressEntry::error(message.clone()),
                    None => ProgressEntry::success(),
                };
                let status = entry.status;
                self.apply(store, item.id, entry);
                report.items.push(ItemOutcome {
                    id: item.id,
                    display_name: item.display_name.clone(),
                    status,
                    storage_key: settled.storage_key,
                    public_url: settled.public_url,
                    record_id: settled.record_id,
                    error_message: settled.error,
                });
            }
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch upload finished"
        );
        report
    }

    async fn upload_one(&self, item: &FileItem, config: &HostConfig) -> Settled {
        let key = self.keys.generate(&config.category, &item.display_name);
        debug!(item = %item.id, key = %key, "uploading");

        let written = match item.handle.read().await {
            Ok(bytes) => self.storage.write(&key, bytes, &item.mime_type).await,
            Err(e) => Err(TransportError::Read(e.to_string())),
        };
        let stored = match written {
            Ok(stored) => stored,
            Err(e) => {
                warn!(item = %item.id, error = %e, "storage write failed");
                return Settled {
                    storage_key: None,
                    public_url: None,
                    record_id: None,
                    error: Some(e.detail().to_string()),
                };
            }
        };

        let record = build_record(item, &stored.public_url, config, &self.default_subcategory);
        match self.metadata.insert(record).await {
            Ok(document) => Settled {
                storage_key: Some(stored.key),
                public_url: Some(stored.public_url),
                record_id: Some(document.id),
                error: None,
            },
            Err(e) => {
                // The object stays in storage without a record.
                warn!(item = %item.id, key = %stored.key, error = %e, "metadata insert failed, object orphaned");
                Settled {
                    storage_key: Some(stored.key),
                    public_url: Some(stored.public_url),
                    record_id: None,
                    error: Some(e.detail().to_string()),
                }
            }
        }
    }

    fn apply(&self, store: &mut SelectionStore, id: ItemId, entry: ProgressEntry) {
        if let Err(e) = store.progress_mut().record(id, entry.clone()) {
            warn!(error = %e, "progress update dropped");
            return;
        }
        if let Some(observer) = &self.observer {
            observer.on_progress(&id, &entry);
        }
    }
}
