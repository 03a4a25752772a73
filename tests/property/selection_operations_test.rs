//! Property-based tests for selection store operations.
//!
//! Arbitrary sequences of add, remove, describe and settle are checked
//! against a plain `Vec` model: order is preserved, identities stay unique
//! and removed items never leave a progress entry behind.

use std::collections::HashSet;
use std::sync::Arc;

use docbatch::managers::selection_store::{SelectionStore, SelectionStoreTrait};
use docbatch::types::file_item::{FileHandle, FileItem, ItemId, PickedFile};
use docbatch::types::progress::{ItemStatus, ProgressEntry};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(Vec<String>),
    Remove(usize),
    Describe(usize, String),
    Settle(usize, bool),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::collection::vec("[a-z]{1,6}\\.(pdf|txt)", 1..4).prop_map(Op::Add),
        any::<usize>().prop_map(Op::Remove),
        (any::<usize>(), "[a-z ]{0,8}").prop_map(|(i, d)| Op::Describe(i, d)),
        (any::<usize>(), any::<bool>()).prop_map(|(i, ok)| Op::Settle(i, ok)),
    ]
}

fn item(name: &str) -> FileItem {
    FileItem::from_picked(PickedFile {
        handle: FileHandle::Memory(Arc::from(name.as_bytes())),
        name: name.to_string(),
        size: name.len() as u64,
        mime_type: "text/plain".to_string(),
    })
}

proptest! {
    #[test]
    fn prop_store_matches_model(ops in proptest::collection::vec(arb_op(), 1..40)) {
        let mut store = SelectionStore::new();
        let mut model: Vec<(ItemId, String)> = Vec::new();
        let mut removed: Vec<ItemId> = Vec::new();

        for op in &ops {
            match op {
                Op::Add(names) => {
                    let ids = store
                        .add_items(names.iter().map(|n| item(n)).collect())
                        .unwrap();
                    prop_assert_eq!(ids.len(), names.len());
                    model.extend(ids.into_iter().zip(names.iter().cloned()));
                }
                Op::Remove(pick) => {
                    if model.is_empty() {
                        continue;
                    }
                    let (id, name) = model.remove(pick % model.len());
                    let gone = store.remove_item(&id).unwrap();
                    prop_assert_eq!(gone.display_name, name);
                    removed.push(id);
                }
                Op::Describe(pick, text) => {
                    if model.is_empty() {
                        continue;
                    }
                    let id = model[pick % model.len()].0;
                    let pending = store.status_of(&id) == ItemStatus::Pending;
                    let result = store.update_description(&id, text);
                    prop_assert_eq!(result.is_ok(), pending);
                    if pending {
                        prop_assert_eq!(&store.get_item(&id).unwrap().description, text);
                    }
                }
                Op::Settle(pick, ok) => {
                    if model.is_empty() {
                        continue;
                    }
                    let id = model[pick % model.len()].0;
                    if store.status_of(&id).is_terminal() {
                        continue;
                    }
                    store.progress_mut().record(id, ProgressEntry::uploading(0)).unwrap();
                    let terminal = if *ok { ProgressEntry::success() } else { ProgressEntry::error("failed") };
                    store.progress_mut().record(id, terminal).unwrap();
                }
            }

            let ids: Vec<ItemId> = model.iter().map(|(id, _)| *id).collect();
            prop_assert_eq!(store.item_ids(), ids.clone());
            let names: Vec<&str> = store.items().iter().map(|i| i.display_name.as_str()).collect();
            let model_names: Vec<&str> = model.iter().map(|(_, n)| n.as_str()).collect();
            prop_assert_eq!(names, model_names);

            let unique: HashSet<ItemId> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());
            for id in &removed {
                prop_assert!(!store.progress().contains(id));
            }
            prop_assert!(store.progress().len() <= store.len());
        }
    }

    #[test]
    fn prop_requeue_keeps_only_unsettled_and_failed(outcomes in proptest::collection::vec(proptest::option::of(any::<bool>()), 0..12)) {
        let mut store = SelectionStore::new();
        let names: Vec<String> = (0..outcomes.len()).map(|i| format!("f{}.txt", i)).collect();
        let ids = store.add_items(names.iter().map(|n| item(n)).collect()).unwrap();

        for (id, outcome) in ids.iter().zip(&outcomes) {
            if let Some(ok) = outcome {
                store.progress_mut().record(*id, ProgressEntry::uploading(0)).unwrap();
                let terminal = if *ok { ProgressEntry::success() } else { ProgressEntry::error("failed") };
                store.progress_mut().record(*id, terminal).unwrap();
            }
        }

        let requeued = store.requeue_failed();
        let expected: Vec<&str> = names
            .iter()
            .zip(&outcomes)
            .filter(|(_, o)| **o != Some(true))
            .map(|(n, _)| n.as_str())
            .collect();
        let kept: Vec<&str> = store.items().iter().map(|i| i.display_name.as_str()).collect();
        prop_assert_eq!(kept, expected);
        prop_assert_eq!(requeued.len(), store.len());
        prop_assert!(store.progress().is_empty());
        for (id, outcome) in ids.iter().zip(&outcomes) {
            if *outcome == Some(false) {
                prop_assert!(store.get_item(id).is_none());
            }
        }
    }
}
