//! docbatch RPC host: JSON-RPC over stdin/stdout for a hosting UI.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:      {"id":1, "method":"selection.pick", "params":{"paths":["/tmp/a.pdf"]}}
//! Response:     {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Notification: {"event":"progress", "id":"<item id>", "status":"uploading", ...}
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::io::{self, Write};
use std::path::PathBuf;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use docbatch::app::App;
use docbatch::rpc_handler::{handle_method, RpcHost};
use docbatch::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use docbatch::services::upload_orchestrator::ProgressObserver;
use docbatch::types::file_item::ItemId;
use docbatch::types::progress::ProgressEntry;

/// Overrides the settings file location.
const SETTINGS_ENV: &str = "DOCBATCH_SETTINGS";
/// Overrides the configured log filter.
const LOG_ENV: &str = "DOCBATCH_LOG";

fn emit(line: &Value) {
    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{}", line).and_then(|_| stdout.flush()).is_err() {
        error!("stdout closed, dropping message");
    }
}

/// Streams every progress write to the host as a notification line.
struct StdoutProgress;

impl ProgressObserver for StdoutProgress {
    fn on_progress(&self, id: &ItemId, entry: &ProgressEntry) {
        emit(&json!({
            "event": "progress",
            "id": id,
            "status": entry.status,
            "progress_percent": entry.progress_percent,
            "error_message": entry.error_message,
        }));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut engine = SettingsEngine::new(std::env::var(SETTINGS_ENV).ok().map(PathBuf::from));
    let settings_result = engine.load();
    let level = settings_result
        .as_ref()
        .map(|s| s.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let settings = match settings_result {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, path = %engine.get_config_path().display(), "falling back to default settings");
            Default::default()
        }
    };

    let app = match App::new(settings) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to initialize docbatch");
            emit(&json!({"event": "fatal", "error": e.to_string()}));
            std::process::exit(1);
        }
    };
    let mut host =
        RpcHost::new(app).with_observer_factory(Box::new(|| Box::new(StdoutProgress)));

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read request");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&mut host, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
    }
}
