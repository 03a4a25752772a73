// docbatch platform paths
// Config and data directories per OS, overridable through environment variables.
//
// Linux:   $XDG_CONFIG_HOME/docbatch, $XDG_DATA_HOME/docbatch (with ~/.config, ~/.local/share fallbacks)
// macOS:   ~/Library/Application Support/docbatch
// Windows: %APPDATA%/docbatch

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "docbatch";

/// Overrides `get_config_dir` when set.
pub const CONFIG_DIR_ENV: &str = "DOCBATCH_CONFIG_DIR";
/// Overrides `get_data_dir` when set.
pub const DATA_DIR_ENV: &str = "DOCBATCH_DATA_DIR";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

fn xdg_or(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(APP_DIR),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join(APP_DIR),
    }
}

/// Returns the directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if cfg!(target_os = "macos") {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR)
    } else if cfg!(target_os = "windows") {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR)
    } else {
        xdg_or("XDG_CONFIG_HOME", &[".config"])
    }
}

/// Returns the directory holding the metadata database and local objects.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if cfg!(target_os = "macos") || cfg!(target_os = "windows") {
        get_config_dir()
    } else {
        xdg_or("XDG_DATA_HOME", &[".local", "share"])
    }
}
