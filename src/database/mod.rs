//! docbatch database layer.
//!
//! SQLite connection management and schema migrations backing the
//! metadata store.
//!
//! ```no_run
//! use docbatch::database::Database;
//!
//! let db = Database::open("docbatch.db").expect("failed to open database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
