//! Versioned schema migrations for the metadata database.
//!
//! Applied versions are recorded in `schema_version`; each migration runs once.

use rusqlite::Connection;

/// Bump when adding a migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the highest applied version (0 on a fresh database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending migrations. Safe to call on every open.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "documents table")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "category and uploader indexes")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: one row per uploaded document.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            size TEXT NOT NULL,
            description TEXT NOT NULL,
            url TEXT NOT NULL,
            category TEXT NOT NULL,
            subcategory TEXT NOT NULL,
            keywords TEXT NOT NULL,
            author_id TEXT NOT NULL,
            uploaded_by_id TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        ",
    )
}

/// V2: lookups by category listing and by uploader.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_documents_category
            ON documents(category, subcategory, created_at);
        CREATE INDEX IF NOT EXISTS idx_documents_uploader
            ON documents(uploaded_by_id);
        ",
    )
}
