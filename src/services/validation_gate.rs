//! Pre-upload readiness check.
//!
//! All-or-nothing: a single violation blocks the whole batch. A
//! [`ValidatedBatch`] can only be obtained through [`validate`]. It records
//! identities, not item contents, so the orchestrator re-checks each item's
//! description as it reaches it and leaves a blanked item Pending.

use crate::types::errors::ValidationError;
use crate::types::file_item::{FileItem, ItemId};

/// Item identities that passed validation, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    order: Vec<ItemId>,
}

impl ValidatedBatch {
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Checks that the batch is non-empty and every item has a description.
///
/// Reports every violation, `EmptyBatch` first, then one
/// `MissingDescription` per offending item in selection order.
pub fn validate(batch: &[FileItem]) -> Result<ValidatedBatch, Vec<ValidationError>> {
    let mut violations = Vec::new();
    if batch.is_empty() {
        violations.push(ValidationError::EmptyBatch);
    }
    violations.extend(
        batch
            .iter()
            .filter(|item| !item.has_description())
            .map(|item| ValidationError::MissingDescription(item.id)),
    );

    if violations.is_empty() {
        Ok(ValidatedBatch {
            order: batch.iter().map(|item| item.id).collect(),
        })
    } else {
        Err(violations)
    }
}
