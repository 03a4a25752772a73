// docbatch shared type definitions
// Each submodule defines types used across the uploader.

pub mod config;
pub mod errors;
pub mod file_item;
pub mod icon;
pub mod outcome;
pub mod progress;
pub mod record;
