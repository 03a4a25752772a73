//! SQLite connection management for the metadata store.
//!
//! [`Database`] wraps a `rusqlite::Connection` and brings the schema up to
//! date every time it is opened.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Owned SQLite connection with an up-to-date schema.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path` and runs pending migrations.
    ///
    /// # Arguments
    /// * `path` - Location of the SQLite file. Its parent directory must already exist.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// Opens a throwaway in-memory database with the full schema.
    ///
    /// The data is discarded when the `Database` is dropped.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
