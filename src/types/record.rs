use serde::{Deserialize, Serialize};

/// Object written by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}

/// Metadata row describing one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    /// Upper-cased file extension, empty when the name has none.
    #[serde(rename = "type")]
    pub doc_type: String,
    pub size_label: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub subcategory: String,
    pub keywords: String,
    pub author_id: String,
    pub uploaded_by_id: String,
}

/// A `DocumentRecord` as persisted by the metadata collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    #[serde(flatten)]
    pub record: DocumentRecord,
    pub created_at: i64,
}
