// docbatch services
// Validation, key generation, the upload loop and its collaborators (picker, object storage,
// metadata store), result aggregation and settings.

pub mod file_picker;
pub mod metadata_store;
pub mod object_storage;
pub mod result_aggregator;
pub mod settings_engine;
pub mod storage_key;
pub mod upload_orchestrator;
pub mod validation_gate;
