//! RPC method handler for the docbatch JSON-RPC protocol.
//!
//! Kept apart from `main.rs` so every method can be unit-tested. One
//! [`RpcHost`] serves one hosting view: at most one upload session is open
//! at a time.

use std::path::PathBuf;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};

use crate::app::{App, UploadSession};
use crate::services::file_picker::{mime_for_extension, PathPicker};
use crate::services::upload_orchestrator::ProgressObserver;
use crate::types::config::HostConfig;
use crate::types::errors::ValidationError;
use crate::types::file_item::{extension_of, FileHandle, ItemId, PickedFile};
use crate::types::icon::FileIcon;

/// Builds the progress observer handed to each new session.
pub type ObserverFactory = Box<dyn Fn() -> Box<dyn ProgressObserver>>;

/// Decode base64 string to bytes.
pub fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    BASE64.decode(input).map_err(|e| format!("base64 decode error: {}", e))
}

/// Application plus the currently open session.
pub struct RpcHost {
    pub app: App,
    session: Option<UploadSession>,
    observer_factory: Option<ObserverFactory>,
}

impl RpcHost {
    pub fn new(app: App) -> Self {
        Self {
            app,
            session: None,
            observer_factory: None,
        }
    }

    pub fn with_observer_factory(mut self, factory: ObserverFactory) -> Self {
        self.observer_factory = Some(factory);
        self
    }

    pub fn session(&self) -> Option<&UploadSession> {
        self.session.as_ref()
    }

    fn session_mut(&mut self) -> Result<&mut UploadSession, String> {
        self.session
            .as_mut()
            .ok_or_else(|| "no open session: call session.open first".to_string())
    }
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn id_param(params: &Value) -> Result<ItemId, String> {
    let raw = str_param(params, "id")?;
    ItemId::parse(raw).ok_or_else(|| format!("invalid id: {}", raw))
}

fn violation_json(v: &ValidationError) -> Value {
    match v {
        ValidationError::EmptyBatch => json!({"kind": "empty_batch", "message": v.to_string()}),
        ValidationError::MissingDescription(id) => {
            json!({"kind": "missing_description", "id": id, "message": v.to_string()})
        }
    }
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(host: &mut RpcHost, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Session ───
        "session.open" => {
            let config: HostConfig =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid config: {}", e))?;
            let observer = host.observer_factory.as_ref().map(|make| make());
            let session = host
                .app
                .open_session(config, observer)
                .map_err(|e| e.to_string())?;
            host.session = Some(session);
            Ok(json!({
                "ok": true,
                "accepted_extensions": host.app.settings.upload.accepted_extensions,
            }))
        }
        "session.reset" => {
            if let Some(mut session) = host.session.take() {
                session.close();
            }
            Ok(json!({"ok": true}))
        }

        // ─── Selection ───
        "selection.pick" => {
            let paths: Vec<PathBuf> = params
                .get("paths")
                .and_then(|v| v.as_array())
                .ok_or("missing paths")?
                .iter()
                .filter_map(|p| p.as_str().map(PathBuf::from))
                .collect();
            let session = host.session_mut()?;
            let ids = session
                .pick(&PathPicker::new(paths))
                .map_err(|e| e.to_string())?;
            Ok(json!({"ids": ids}))
        }
        "selection.add_bytes" => {
            let name = str_param(params, "name")?;
            let bytes = base64_decode(str_param(params, "content_base64")?)?;
            let mime_type = params
                .get("mime_type")
                .and_then(|v| v.as_str())
                .unwrap_or_else(|| mime_for_extension(extension_of(name)))
                .to_string();
            let picked = PickedFile {
                size: bytes.len() as u64,
                handle: FileHandle::Memory(Arc::from(bytes)),
                name: name.to_string(),
                mime_type,
            };
            let session = host.session_mut()?;
            let id = session.add_supplied(picked).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "selection.remove" => {
            let id = id_param(params)?;
            host.session_mut()?
                .remove_item(&id)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "selection.describe" => {
            let id = id_param(params)?;
            let description = str_param(params, "description")?;
            host.session_mut()?
                .describe(&id, description)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "selection.list" => {
            let session = host.session_mut()?;
            let items: Vec<Value> = session
                .snapshot()
                .into_iter()
                .map(|s| {
                    let icon = FileIcon::from_extension(extension_of(&s.display_name));
                    let mut value = json!(s);
                    value["icon"] = json!(icon);
                    value
                })
                .collect();
            Ok(json!({"items": items}))
        }

        // ─── Batch ───
        "batch.validate" => {
            let session = host.session_mut()?;
            match session.validate() {
                Ok(batch) => Ok(json!({"ready": true, "count": batch.len(), "violations": []})),
                Err(violations) => {
                    let list: Vec<Value> = violations.iter().map(violation_json).collect();
                    Ok(json!({"ready": false, "violations": list}))
                }
            }
        }
        "batch.upload" => {
            let session = host.session_mut()?;
            let (report, outcome) = session.upload().await.map_err(|e| e.to_string())?;
            Ok(json!({"report": report, "outcome": outcome}))
        }
        "batch.retry" => {
            let session = host.session_mut()?;
            let ids = session.prepare_retry();
            Ok(json!({"ids": ids}))
        }

        // ─── Documents ───
        "documents.list" => {
            let category = str_param(params, "category")?;
            let docs = host
                .app
                .metadata
                .list_by_category(category)
                .map_err(|e| e.to_string())?;
            Ok(json!({"items": docs}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
