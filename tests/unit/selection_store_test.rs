//! Integration-level tests for the selection store and its progress tracker.

use std::sync::Arc;

use docbatch::managers::selection_store::{SelectionStore, SelectionStoreTrait};
use docbatch::types::errors::StoreError;
use docbatch::types::file_item::{FileHandle, FileItem, ItemId, PickedFile};
use docbatch::types::progress::{ItemStatus, ProgressEntry};

fn item(name: &str) -> FileItem {
    FileItem::from_picked(PickedFile {
        handle: FileHandle::Memory(Arc::from(&b"data"[..])),
        name: name.to_string(),
        size: 4,
        mime_type: "text/plain".to_string(),
    })
}

fn settle(store: &mut SelectionStore, id: ItemId, terminal: ProgressEntry) {
    store
        .progress_mut()
        .record(id, ProgressEntry::uploading(0))
        .unwrap();
    store.progress_mut().record(id, terminal).unwrap();
}

#[test]
fn test_add_preserves_order_and_keeps_duplicates() {
    let mut store = SelectionStore::new();
    let first = store.add_items(vec![item("a.txt"), item("b.txt")]).unwrap();
    let second = store.add_items(vec![item("a.txt")]).unwrap();

    let names: Vec<_> = store.items().iter().map(|i| i.display_name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "a.txt"]);
    assert_ne!(first[0], second[0]);
    assert_eq!(store.item_ids(), [first, second].concat());
}

#[test]
fn test_add_rejects_empty_name_without_partial_insert() {
    let mut store = SelectionStore::new();
    let result = store.add_items(vec![item("ok.txt"), item("")]);
    assert_eq!(result, Err(StoreError::EmptyDisplayName));
    assert!(store.is_empty());
}

#[test]
fn test_new_items_start_pending_with_empty_description() {
    let mut store = SelectionStore::new();
    store.add_items(vec![item("a.txt")]).unwrap();
    let snap = &store.snapshot()[0];
    assert_eq!(snap.status, ItemStatus::Pending);
    assert_eq!(snap.progress_percent, 0);
    assert_eq!(snap.description, "");
    assert_eq!(snap.error_message, None);
}

#[test]
fn test_remove_drops_progress_entry() {
    let mut store = SelectionStore::new();
    let ids = store.add_items(vec![item("a.txt"), item("b.txt")]).unwrap();
    settle(&mut store, ids[0], ProgressEntry::error("boom"));

    let removed = store.remove_item(&ids[0]).unwrap();
    assert_eq!(removed.display_name, "a.txt");
    assert!(!store.progress().contains(&ids[0]));
    assert_eq!(store.item_ids(), vec![ids[1]]);
}

#[test]
fn test_remove_unknown_is_not_found() {
    let mut store = SelectionStore::new();
    let ghost = ItemId::new();
    assert_eq!(store.remove_item(&ghost).unwrap_err(), StoreError::NotFound(ghost));
}

#[test]
fn test_update_description_keeps_raw_text() {
    let mut store = SelectionStore::new();
    let ids = store.add_items(vec![item("a.txt")]).unwrap();
    store.update_description(&ids[0], "  padded  ").unwrap();
    assert_eq!(store.get_item(&ids[0]).unwrap().description, "  padded  ");
}

#[test]
fn test_update_description_after_settle_is_rejected() {
    let mut store = SelectionStore::new();
    let ids = store.add_items(vec![item("a.txt")]).unwrap();
    settle(&mut store, ids[0], ProgressEntry::success());
    assert_eq!(
        store.update_description(&ids[0], "late"),
        Err(StoreError::NotPending(ids[0]))
    );
}

#[test]
fn test_reset_clears_items_and_progress() {
    let mut store = SelectionStore::new();
    let ids = store.add_items(vec![item("a.txt")]).unwrap();
    settle(&mut store, ids[0], ProgressEntry::success());
    store.reset();
    assert!(store.is_empty());
    assert!(store.progress().is_empty());
}

#[test]
fn test_requeue_failed_renews_errors_and_drops_successes() {
    let mut store = SelectionStore::new();
    let ids = store
        .add_items(vec![item("ok.txt"), item("bad.txt"), item("new.txt")])
        .unwrap();
    store.update_description(&ids[1], "keep me").unwrap();
    settle(&mut store, ids[0], ProgressEntry::success());
    settle(&mut store, ids[1], ProgressEntry::error("timeout"));

    let requeued = store.requeue_failed();
    assert_eq!(requeued.len(), 2);
    assert_ne!(requeued[0], ids[1]);
    assert_eq!(requeued[1], ids[2]);

    let retried = store.get_item(&requeued[0]).unwrap();
    assert_eq!(retried.display_name, "bad.txt");
    assert_eq!(retried.description, "keep me");
    assert!(store.progress().is_empty());
    assert_eq!(store.status_of(&requeued[0]), ItemStatus::Pending);
}

#[test]
fn test_progress_never_moves_backwards() {
    let mut store = SelectionStore::new();
    let ids = store.add_items(vec![item("a.txt")]).unwrap();
    settle(&mut store, ids[0], ProgressEntry::success());

    assert!(store
        .progress_mut()
        .record(ids[0], ProgressEntry::uploading(50))
        .is_err());
    assert!(store
        .progress_mut()
        .record(ids[0], ProgressEntry::error("late"))
        .is_err());
    assert_eq!(store.status_of(&ids[0]), ItemStatus::Success);
}
