use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use sumdedup::duplicates::DuplicateFinder;
use sumdedup::scanner::Fingerprint;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_identical_content_shares_a_group() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"duplicate content");
    write(&dir.path().join("nested/deeper/b.txt"), b"duplicate content");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(groups[0].fingerprint, Fingerprint::of_bytes(b"duplicate content"));
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_same_size_different_content_not_grouped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"abcd");
    write(&dir.path().join("b.txt"), b"abce");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.buckets, 2);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_multiple_groups() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a1"), b"group a");
    write(&dir.path().join("a2"), b"group a");
    write(&dir.path().join("a3"), b"group a");
    write(&dir.path().join("b1"), b"group bb");
    write(&dir.path().join("b2"), b"group bb");
    write(&dir.path().join("unique"), b"nothing like it");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(summary.duplicate_groups, 2);
    assert_eq!(summary.duplicate_files, 3);
    assert_eq!(summary.reclaimable_space, 2 * 7 + 8);
    assert_eq!(summary.total_files, 6);
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size(), 0);
    assert_eq!(groups[0].wasted_space(), 0);
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert!(!summary.has_failures());
}

#[test]
fn test_sequential_members_follow_walk_order() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("z/last"), b"same");
    write(&dir.path().join("a/first"), b"same");
    write(&dir.path().join("m"), b"same");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    let names: Vec<_> = groups[0].files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["first", "m", "last"]);
}

#[test]
fn test_large_file_fingerprint() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
    write(&dir.path().join("big1"), &content);
    write(&dir.path().join("big2"), &content);

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size(), 300_000);
}
