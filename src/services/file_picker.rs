//! Picker collaborator.
//!
//! The core only sees `PickedFile`s; how files are chosen is up to the
//! implementation. [`PathPicker`] turns a list of paths (command line,
//! host request) into picked files the way a native dialog would.

use std::path::PathBuf;

use crate::types::errors::SelectionError;
use crate::types::file_item::{extension_of, FileHandle, PickedFile};

/// Trait defining the picker interface.
pub trait FilePicker {
    /// `type_filters` are accepted extensions without the dot; empty accepts
    /// everything. Returns `Cancelled` when nothing was chosen.
    fn pick(
        &self,
        type_filters: &[String],
        allow_multiple: bool,
    ) -> Result<Vec<PickedFile>, SelectionError>;
}

/// Best-effort MIME type for a file extension.
pub fn mime_for_extension(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return "application/octet-stream";
    };
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Whether `name` passes the extension filter.
pub fn matches_filter(name: &str, type_filters: &[String]) -> bool {
    if type_filters.is_empty() {
        return true;
    }
    match extension_of(name) {
        Some(ext) => type_filters
            .iter()
            .any(|f| f.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Picks from a fixed list of filesystem paths.
pub struct PathPicker {
    paths: Vec<PathBuf>,
}

impl PathPicker {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl FilePicker for PathPicker {
    fn pick(
        &self,
        type_filters: &[String],
        allow_multiple: bool,
    ) -> Result<Vec<PickedFile>, SelectionError> {
        let take = if allow_multiple { self.paths.len() } else { 1 };
        let mut picked = Vec::new();

        for path in self.paths.iter().take(take) {
            let metadata = std::fs::metadata(path).map_err(|e| {
                SelectionError::PickerFailed(format!("{}: {}", path.display(), e))
            })?;
            if !metadata.is_file() {
                return Err(SelectionError::PickerFailed(format!(
                    "{}: not a regular file",
                    path.display()
                )));
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    SelectionError::PickerFailed(format!("{}: no file name", path.display()))
                })?;
            if !matches_filter(&name, type_filters) {
                return Err(SelectionError::UnsupportedType(name));
            }

            picked.push(PickedFile {
                handle: FileHandle::Path(path.clone()),
                mime_type: mime_for_extension(extension_of(&name)).to_string(),
                size: metadata.len(),
                name,
            });
        }

        if picked.is_empty() {
            return Err(SelectionError::Cancelled);
        }
        Ok(picked)
    }
}
