use std::fs::{self, File};
use std::io::Write;
use sumdedup::duplicates::DuplicateFinder;
use sumdedup::scanner::PlatformIdentity;
use tempfile::tempdir;

#[test]
fn test_hardlink_pair_plus_copy_is_three_member_group() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let hardlink = dir.path().join("hardlink.txt");
    let copy = dir.path().join("copy.txt");

    File::create(&original)
        .unwrap()
        .write_all(b"identical content")
        .unwrap();
    File::create(&copy)
        .unwrap()
        .write_all(b"identical content")
        .unwrap();

    if let Err(e) = fs::hard_link(&original, &hardlink) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    // Different names keep the link pair apart; only repeated visits of one
    // path collapse.
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 3);
    assert_eq!(summary.collapsed_entries, 0);

    if PlatformIdentity::is_supported() {
        let id = |name: &str| {
            groups[0]
                .files
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.identity.clone())
                .unwrap()
        };
        assert_eq!(id("original.txt"), id("hardlink.txt"));
        assert_ne!(id("original.txt"), id("copy.txt"));
    }
}

#[test]
fn test_hardlink_seen_through_two_roots_collapses_once() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    File::create(sub.join("a")).unwrap().write_all(b"x").unwrap();
    if let Err(e) = fs::hard_link(sub.join("a"), dir.path().join("b")) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf(), sub.clone()])
        .unwrap();

    assert_eq!(summary.collapsed_entries, 1);
    assert_eq!(groups[0].files.len(), 2);
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_followed() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");

    File::create(&original)
        .unwrap()
        .write_all(b"some content")
        .unwrap();
    std::os::unix::fs::symlink(&original, dir.path().join("symlink.txt")).unwrap();

    let other = tempdir().unwrap();
    std::os::unix::fs::symlink(other.path(), dir.path().join("linked_dir")).unwrap();
    File::create(other.path().join("inside.txt"))
        .unwrap()
        .write_all(b"some content")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[cfg(unix)]
#[test]
fn test_identity_format_is_dev_plus_inode() {
    use std::os::unix::fs::MetadataExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("f");
    File::create(&path).unwrap().write_all(b"1").unwrap();
    File::create(dir.path().join("g")).unwrap().write_all(b"1").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    let meta = fs::metadata(&path).unwrap();
    let expected = format!("{}+{}", meta.dev(), meta.ino());
    assert_eq!(groups[0].files[0].identity.as_str(), expected);
}
