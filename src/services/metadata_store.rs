//! Metadata collaborator: one record per uploaded document.
//!
//! The orchestrator only needs [`MetadataStore::insert`]; the SQLite
//! implementation adds lookups for hosts that list what was uploaded.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Row};
use tracing::debug;
use uuid::Uuid;

use crate::database::connection::Database;
use crate::types::errors::PersistenceError;
use crate::types::record::{DocumentRecord, StoredDocument};

#[async_trait::async_trait(?Send)]
pub trait MetadataStore {
    async fn insert(&self, record: DocumentRecord) -> Result<StoredDocument, PersistenceError>;
}

/// Metadata store backed by the `documents` table.
pub struct SqliteMetadataStore {
    db: Arc<Database>,
}

const SELECT_COLUMNS: &str = "SELECT id, name, type, size, description, url, category, subcategory, keywords, author_id, uploaded_by_id, created_at FROM documents";

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<StoredDocument> {
    Ok(StoredDocument {
        id: row.get(0)?,
        record: DocumentRecord {
            name: row.get(1)?,
            doc_type: row.get(2)?,
            size_label: row.get(3)?,
            description: row.get(4)?,
            url: row.get(5)?,
            category: row.get(6)?,
            subcategory: row.get(7)?,
            keywords: row.get(8)?,
            author_id: row.get(9)?,
            uploaded_by_id: row.get(10)?,
        },
        created_at: row.get(11)?,
    })
}

fn db_err(e: rusqlite::Error) -> PersistenceError {
    PersistenceError::Database(e.to_string())
}

impl SqliteMetadataStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn now_ts() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    pub fn get(&self, id: &str) -> Result<Option<StoredDocument>, PersistenceError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .map_err(db_err)?;
        let mut rows = stmt.query_map(params![id], row_to_document).map_err(db_err)?;
        rows.next().transpose().map_err(db_err)
    }

    /// Documents in `category`, oldest first.
    pub fn list_by_category(&self, category: &str) -> Result<Vec<StoredDocument>, PersistenceError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&format!(
                "{} WHERE category = ?1 ORDER BY created_at ASC, rowid ASC",
                SELECT_COLUMNS
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![category], row_to_document)
            .map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    pub fn count(&self) -> Result<usize, PersistenceError> {
        self.db
            .connection()
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(db_err)
    }
}

#[async_trait::async_trait(?Send)]
impl MetadataStore for SqliteMetadataStore {
    async fn insert(&self, record: DocumentRecord) -> Result<StoredDocument, PersistenceError> {
        if record.name.is_empty() || record.url.is_empty() {
            return Err(PersistenceError::Rejected(
                "record name and url are required".to_string(),
            ));
        }
        let stored = StoredDocument {
            id: Uuid::new_v4().to_string(),
            record,
            created_at: Self::now_ts(),
        };
        let r = &stored.record;
        self.db
            .connection()
            .execute(
                "INSERT INTO documents (id, name, type, size, description, url, category, subcategory, keywords, author_id, uploaded_by_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    stored.id, r.name, r.doc_type, r.size_label, r.description, r.url,
                    r.category, r.subcategory, r.keywords, r.author_id, r.uploaded_by_id,
                    stored.created_at
                ],
            )
            .map_err(db_err)?;
        debug!(id = %stored.id, name = %r.name, "document record inserted");
        Ok(stored)
    }
}
