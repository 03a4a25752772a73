//! Tests for the path-based picker against real files on disk.

use docbatch::services::file_picker::{matches_filter, FilePicker, PathPicker};
use docbatch::types::errors::SelectionError;
use docbatch::types::file_item::FileHandle;
use rstest::rstest;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn filters(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_pick_multiple_keeps_order_and_sizes() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.pdf", b"12345");
    let b = write(&dir, "b.csv", b"x,y");

    let picked = PathPicker::new(vec![a.clone(), b]).pick(&[], true).unwrap();
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0].name, "a.pdf");
    assert_eq!(picked[0].size, 5);
    assert_eq!(picked[0].mime_type, "application/pdf");
    assert_eq!(picked[1].name, "b.csv");
    assert_eq!(picked[1].mime_type, "text/csv");
    assert!(matches!(&picked[0].handle, FileHandle::Path(p) if *p == a));
}

#[test]
fn test_single_mode_takes_first_path_only() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.txt", b"a");
    let b = write(&dir, "b.txt", b"b");

    let picked = PathPicker::new(vec![a, b]).pick(&[], false).unwrap();
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].name, "a.txt");
}

#[test]
fn test_nothing_chosen_is_cancelled() {
    let result = PathPicker::new(Vec::new()).pick(&[], true);
    assert_eq!(result.unwrap_err(), SelectionError::Cancelled);
}

#[test]
fn test_missing_file_fails_picker() {
    let dir = TempDir::new().unwrap();
    let result = PathPicker::new(vec![dir.path().join("gone.pdf")]).pick(&[], true);
    assert!(matches!(result, Err(SelectionError::PickerFailed(_))));
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = TempDir::new().unwrap();
    let result = PathPicker::new(vec![dir.path().to_path_buf()]).pick(&[], true);
    assert!(matches!(result, Err(SelectionError::PickerFailed(msg)) if msg.contains("not a regular file")));
}

#[test]
fn test_filter_rejects_unlisted_type() {
    let dir = TempDir::new().unwrap();
    let ok = write(&dir, "a.pdf", b"a");
    let bad = write(&dir, "run.sh", b"#!");

    let result = PathPicker::new(vec![ok, bad]).pick(&filters(&["pdf", "docx"]), true);
    assert_eq!(
        result.unwrap_err(),
        SelectionError::UnsupportedType("run.sh".to_string())
    );
}

#[rstest]
#[case("report.PDF", &["pdf"], true)]
#[case("report.pdf", &[".pdf"], true)]
#[case("sheet.xlsx", &["pdf", "xlsx"], true)]
#[case("notes", &["txt"], false)]
#[case("archive.tar.gz", &["tar"], false)]
#[case("anything.bin", &[], true)]
fn test_matches_filter(#[case] name: &str, #[case] list: &[&str], #[case] expected: bool) {
    assert_eq!(matches_filter(name, &filters(list)), expected);
}
