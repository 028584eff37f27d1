//! File locator tests over temporary directory trees.

use std::fs;
use std::path::{Path, PathBuf};

use markaudit_analysis::scanner::{find_test_files, ScanCancellation, TestFileLocator};
use markaudit_core::config::ScanConfig;
use markaudit_core::errors::ScanError;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "def test_x():\n    pass\n").unwrap();
}

fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
    files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn test_finds_only_prefixed_python_files_sorted() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().join("tests");
    touch(&root, "test_b.py");
    touch(&root, "sub/test_a.py");
    touch(&root, "conftest.py");
    touch(&root, "helpers.py");
    touch(&root, "test_notes.txt");
    touch(&root, ".cache/test_hidden.py");

    let located = find_test_files(&[root.clone()], &ScanConfig::default()).unwrap();
    assert_eq!(names(&located.files, &root), vec!["sub/test_a.py", "test_b.py"]);
    assert!(located.errors.is_empty());
}

#[test]
fn test_missing_roots_are_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let present = dir.path().join("tests");
    let missing = dir.path().join("integration_tests");
    touch(&present, "test_one.py");

    let located = find_test_files(&[missing.clone(), present.clone()], &ScanConfig::default()).unwrap();
    assert_eq!(located.files.len(), 1);
    assert_eq!(located.skipped_roots, vec![missing]);
}

#[test]
fn test_exclude_patterns_and_ignore_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().join("tests");
    touch(&root, "test_keep.py");
    touch(&root, "legacy/test_old.py");
    touch(&root, "generated/test_gen.py");
    fs::write(root.join(".ignore"), "generated/\n").unwrap();

    let config = ScanConfig {
        exclude: vec!["legacy".to_string()],
        ..Default::default()
    };
    let located = find_test_files(&[root.clone()], &config).unwrap();
    assert_eq!(names(&located.files, &root), vec!["test_keep.py"]);
}

#[test]
fn test_custom_prefix_and_extensions() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    touch(&root, "check_a.py");
    touch(&root, "check_b.pyw");
    touch(&root, "test_c.py");

    let config = ScanConfig {
        file_prefix: Some("check_".to_string()),
        extensions: Some(vec!["py".to_string(), ".pyw".to_string()]),
        ..Default::default()
    };
    let located = find_test_files(&[root.clone()], &config).unwrap();
    assert_eq!(names(&located.files, &root), vec!["check_a.py", "check_b.pyw"]);
}

#[test]
fn test_invalid_exclude_pattern_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    touch(dir.path(), "test_a.py");
    let config = ScanConfig {
        exclude: vec!["[".to_string()],
        ..Default::default()
    };
    let err = find_test_files(&[dir.path().to_path_buf()], &config).unwrap_err();
    assert!(matches!(err, ScanError::InvalidPattern { .. }));
}

#[test]
fn test_cancelled_scan_stops() {
    let dir = tempfile::TempDir::new().unwrap();
    touch(dir.path(), "test_a.py");
    let cancellation = ScanCancellation::new();
    cancellation.cancel();
    let err = TestFileLocator::new(&ScanConfig::default())
        .with_cancellation(cancellation)
        .locate(&[dir.path().to_path_buf()])
        .unwrap_err();
    assert!(matches!(err, ScanError::Cancelled));
}
