//! Bucket normalisation: exact-entry collapse, root-precedence ordering and
//! duplicate group extraction.
//!
//! # Overview
//!
//! After every walker has finished, each fingerprint bucket is normalised:
//!
//! 1. **Exact-entry collapse**: records with the same identity, name and path
//!    are the same visit repeated (a root listed twice, nested roots) and
//!    keep only their first occurrence. Hardlinks have different names or
//!    paths and are kept.
//! 2. **Ordering** (parallel walks, or when sorting is requested): members
//!    are ordered by the position of their enclosing root in the root list,
//!    then by path. Position 0 is the copy a keep-first policy retains, so
//!    this order must not depend on worker scheduling.
//!
//! Buckets that still hold two or more records become [`DuplicateGroup`]s.
//!
//! # Example
//!
//! ```
//! use sumdedup::duplicates::{build_groups, DedupIndex, RootOrder};
//! use sumdedup::scanner::{FileIdentity, FileRecord, Fingerprint};
//! use std::path::PathBuf;
//!
//! let index = DedupIndex::new();
//! let fp = Fingerprint::of_bytes(b"hello");
//! index.insert(fp, FileRecord::new(PathBuf::from("/b/y"), "y", FileIdentity::new("1+2")));
//! index.insert(fp, FileRecord::new(PathBuf::from("/a/x"), "x", FileIdentity::new("1+3")));
//!
//! let order = RootOrder::new(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
//! let (groups, stats) = build_groups(index.into_buckets(), &order, true);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].files[0].path, PathBuf::from("/a/x"));
//! assert_eq!(stats.duplicate_groups, 1);
//! ```

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use super::index::Buckets;
use crate::scanner::{FileRecord, Fingerprint};

/// Confirmed duplicate set: records sharing one fingerprint, collapsed and
/// ordered, with at least two members.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Shared content fingerprint
    pub fingerprint: Fingerprint,
    /// Members; index 0 is the keep-first survivor
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, files: Vec<FileRecord>) -> Self {
        Self { fingerprint, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Content size in bytes shared by every member.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.fingerprint.size
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes occupied by the copies beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size() * self.duplicate_count() as u64
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Root precedence used to order bucket members.
#[derive(Debug, Clone, Default)]
pub struct RootOrder {
    roots: Vec<PathBuf>,
}

impl RootOrder {
    /// Create a root order from the caller's root list.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Roots in precedence order.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Position of the first root that contains `path`.
    ///
    /// Containment is checked on whole path components, so `/data2/x` is
    /// not inside `/data`.
    #[must_use]
    pub fn root_index(&self, path: &Path) -> Option<usize> {
        self.roots.iter().position(|root| path.starts_with(root))
    }

    /// Sort key of a record: root position (unknown roots last), then the
    /// raw path.
    #[must_use]
    pub fn sort_key<'r>(&self, record: &'r FileRecord) -> (usize, &'r OsStr) {
        (
            self.root_index(&record.path).unwrap_or(usize::MAX),
            record.path.as_os_str(),
        )
    }

    /// Compare two records by [`sort_key`](Self::sort_key).
    #[must_use]
    pub fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        self.sort_key(a).cmp(&self.sort_key(b))
    }

    /// Sort a bucket in place.
    pub fn sort(&self, files: &mut [FileRecord]) {
        files.sort_by(|a, b| self.compare(a, b));
    }
}

/// Collapse records that are the same filesystem entry visit, keeping the
/// first occurrence and the relative order of the rest.
#[must_use]
pub fn dedup_exact_entries(files: Vec<FileRecord>) -> Vec<FileRecord> {
    let mut kept: Vec<FileRecord> = Vec::with_capacity(files.len());
    for file in files {
        if !kept.iter().any(|k| k.is_same_entry(&file)) {
            kept.push(file);
        }
    }
    kept
}

/// Statistics from the grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Number of fingerprint buckets examined
    pub buckets: usize,
    /// Records in the index before collapsing
    pub records: usize,
    /// Records dropped as repeated visits of the same entry
    pub collapsed_entries: usize,
    /// Buckets with 2+ members after collapsing
    pub duplicate_groups: usize,
    /// Members beyond the first across all groups
    pub duplicate_files: usize,
    /// Bytes held by those extra members
    pub wasted_space: u64,
}

/// Normalise every bucket and extract the duplicate groups.
///
/// Groups are returned ordered by the sort key of their first member, then
/// by fingerprint, so the report order is stable across runs.
///
/// # Arguments
///
/// * `buckets` - The complete index, taken after every worker has joined
/// * `order` - Root precedence
/// * `sort` - Whether to reorder members (parallel walks or explicit sort)
#[must_use]
pub fn build_groups(
    buckets: Buckets,
    order: &RootOrder,
    sort: bool,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut stats = GroupingStats {
        buckets: buckets.len(),
        records: buckets.values().map(Vec::len).sum(),
        ..Default::default()
    };

    let normalized: Vec<(DuplicateGroup, usize)> = buckets
        .into_par_iter()
        .map(|(fingerprint, files)| {
            let before = files.len();
            let mut files = dedup_exact_entries(files);
            if sort {
                order.sort(&mut files);
            }
            let collapsed = before - files.len();
            (DuplicateGroup::new(fingerprint, files), collapsed)
        })
        .collect();

    let mut groups = Vec::new();
    for (group, collapsed) in normalized {
        stats.collapsed_entries += collapsed;
        if group.len() > 1 {
            stats.duplicate_files += group.duplicate_count();
            stats.wasted_space += group.wasted_space();
            groups.push(group);
        }
    }
    stats.duplicate_groups = groups.len();

    groups.sort_by(|a, b| {
        order
            .compare(&a.files[0], &b.files[0])
            .then_with(|| a.fingerprint.cmp(&b.fingerprint))
    });

    log::debug!(
        "Grouping complete: {} buckets, {} records, {} collapsed, {} duplicate groups",
        stats.buckets,
        stats.records,
        stats.collapsed_entries,
        stats.duplicate_groups
    );

    (groups, stats)
}
