// docbatch Settings Engine
// Loads and saves uploader settings (storage backend, metadata database, upload policy, logging)
// as a JSON file at the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::platform;
use crate::types::config::UploaderSettings;
use crate::types::errors::SettingsError;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<UploaderSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &UploaderSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine persisting `UploaderSettings` as JSON on disk.
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: UploaderSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine holding default settings.
    ///
    /// Nothing is read from disk until `load` is called.
    ///
    /// # Arguments
    /// * `path_override` - Config file to use. When `None`, the engine uses
    ///   `settings.json` in the platform config directory.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path =
            path_override.unwrap_or_else(|| platform::get_config_dir().join("settings.json"));
        Self {
            config_path,
            settings: UploaderSettings::default(),
        }
    }

    /// Wraps already-loaded settings without touching the disk until `save`.
    ///
    /// # Arguments
    /// * `config_path` - Where `save` will write the settings.
    /// * `settings` - Settings to hold. They are not validated here.
    pub fn with_settings(config_path: PathBuf, settings: UploaderSettings) -> Self {
        Self {
            config_path,
            settings,
        }
    }

    fn check(settings: &UploaderSettings) -> Result<(), SettingsError> {
        if settings.upload.max_concurrent_uploads == 0 {
            return Err(SettingsError::InvalidValue(
                "upload.max_concurrent_uploads must be at least 1".to_string(),
            ));
        }
        if settings.upload.default_subcategory.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "upload.default_subcategory must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Walks `parts` into `root` and replaces the existing leaf with `value`.
fn replace_at_path(root: &mut Value, key: &str, value: Value) -> Result<(), SettingsError> {
    let parts: Vec<&str> = key.split('.').collect();
    let (leaf, parents) = parts
        .split_last()
        .ok_or_else(|| SettingsError::InvalidKey("Key cannot be empty".to_string()))?;

    let mut current = root;
    for part in parents {
        current = current
            .get_mut(*part)
            .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
    }

    match current {
        Value::Object(map) if map.contains_key(*leaf) => {
            map.insert(leaf.to_string(), value);
            Ok(())
        }
        Value::Object(_) => Err(SettingsError::InvalidKey(format!(
            "Key '{}' not found in settings",
            key
        ))),
        _ => Err(SettingsError::InvalidKey(format!(
            "Cannot navigate to key '{}': intermediate value is not an object",
            key
        ))),
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file yields defaults; a malformed file is an error.
    fn load(&mut self) -> Result<UploaderSettings, SettingsError> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no settings file, using defaults");
            self.settings = UploaderSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: UploaderSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Self::check(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(&self.config_path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &UploaderSettings {
        &self.settings
    }

    /// Updates one value by dot path (`"upload.max_concurrent_uploads"`) and
    /// saves immediately. The whole document is re-validated first.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        replace_at_path(&mut json_value, key, value)?;

        let new_settings: UploaderSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        Self::check(&new_settings)?;

        self.settings = new_settings;
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = UploaderSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
