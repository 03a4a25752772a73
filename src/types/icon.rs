use serde::{Deserialize, Serialize};

/// Icon category shown next to a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileIcon {
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    Image,
    Archive,
    Text,
    Generic,
}

impl FileIcon {
    pub fn from_extension(extension: Option<&str>) -> Self {
        let Some(ext) = extension else {
            return FileIcon::Generic;
        };
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => FileIcon::Pdf,
            "doc" | "docx" | "odt" | "rtf" => FileIcon::Document,
            "xls" | "xlsx" | "ods" | "csv" => FileIcon::Spreadsheet,
            "ppt" | "pptx" | "odp" => FileIcon::Presentation,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" => FileIcon::Image,
            "zip" | "rar" | "7z" | "tar" | "gz" => FileIcon::Archive,
            "txt" | "md" => FileIcon::Text,
            _ => FileIcon::Generic,
        }
    }
}
