// docbatch state managers
// Managers hold the mutable session state: the selection list and its upload progress.

pub mod progress_tracker;
pub mod selection_store;
