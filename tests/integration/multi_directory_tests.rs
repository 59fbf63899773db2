use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use sumdedup::duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig};
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn group_paths(groups: &[DuplicateGroup]) -> Vec<Vec<PathBuf>> {
    groups.iter().map(DuplicateGroup::paths).collect()
}

#[test]
fn test_scan_two_directories() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("x"), b"hello");
    write(&b.path().join("y"), b"hello");

    let finder = DuplicateFinder::new(FinderConfig::default().with_sort(true));
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths(),
        vec![a.path().join("x"), b.path().join("y")]
    );
    assert_eq!(summary.roots, 2);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_root_listed_twice_yields_one_record_per_path() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"dup");
    write(&dir.path().join("b"), b"dup");

    for parallel in [false, true] {
        let finder = DuplicateFinder::new(FinderConfig::default().with_parallel(parallel));
        let (groups, summary) = finder
            .find_duplicates_in_paths(vec![dir.path().to_path_buf(), dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(summary.collapsed_entries, 2);
    }
}

#[test]
fn test_nested_roots_collapse_and_rank_by_first_root() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    write(&dir.path().join("top.txt"), b"content");
    write(&sub.join("inner.txt"), b"content");

    let finder = DuplicateFinder::new(FinderConfig::default().with_parallel(true));
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![sub.clone(), dir.path().to_path_buf()])
        .unwrap();

    // inner.txt is seen by both walks but reported once, and ranks first
    // because `sub` is listed first.
    assert_eq!(summary.total_files, 3);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths(),
        vec![sub.join("inner.txt"), dir.path().join("top.txt")]
    );
}

#[test]
fn test_sequential_and_parallel_agree() {
    let roots: Vec<_> = (0..4).map(|_| tempdir().unwrap()).collect();
    for (i, root) in roots.iter().enumerate() {
        write(&root.path().join("common.bin"), b"shared by every root");
        write(&root.path().join(format!("pair{}", i / 2)), format!("pair {}", i / 2).as_bytes());
        write(&root.path().join("deep/a/b/c.txt"), b"deep shared");
        write(&root.path().join(format!("own{i}")), format!("unique {i}").as_bytes());
    }
    let paths: Vec<PathBuf> = roots.iter().rev().map(|r| r.path().to_path_buf()).collect();

    let sequential = DuplicateFinder::new(FinderConfig::default().with_sort(true))
        .find_duplicates_in_paths(paths.clone())
        .unwrap()
        .0;

    for _ in 0..5 {
        let parallel = DuplicateFinder::new(FinderConfig::default().with_parallel(true))
            .find_duplicates_in_paths(paths.clone())
            .unwrap()
            .0;
        assert_eq!(group_paths(&sequential), group_paths(&parallel));
    }

    assert_eq!(sequential.len(), 4);
    // Every group starts in the first listed root that holds a copy.
    assert!(sequential[0].files[0].path.starts_with(&paths[0]));
}

#[test]
fn test_root_prefix_is_not_containment() {
    let parent = tempdir().unwrap();
    let data = parent.path().join("data");
    let data2 = parent.path().join("data2");
    write(&data2.join("x"), b"same");
    write(&data.join("y"), b"same");

    let finder = DuplicateFinder::new(FinderConfig::default().with_sort(true));
    let (groups, _) = finder
        .find_duplicates_in_paths(vec![data2.clone(), data.clone()])
        .unwrap();

    // data2/x belongs to root 0, not to root 1 by string prefix.
    assert_eq!(groups[0].paths(), vec![data2.join("x"), data.join("y")]);
}

#[test]
fn test_invalid_root_among_valid_ones_fails_fast() {
    let a = tempdir().unwrap();
    write(&a.path().join("x"), b"1");

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates_in_paths(vec![
        a.path().to_path_buf(),
        PathBuf::from("/non/existent/sumdedup/root"),
    ]);

    assert!(result.is_err());
}
