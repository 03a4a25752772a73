//! docbatch: select documents, describe each one, and upload them as a batch
//! to object storage with one metadata record per file.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
