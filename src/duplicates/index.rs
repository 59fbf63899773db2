//! Shared fingerprint index filled by the walk workers.
//!
//! # Overview
//!
//! [`DedupIndex`] maps a [`Fingerprint`] to the records that produced it, in
//! arrival order. Workers insert through a shared reference; one mutex
//! guards the whole map since an insert is short next to hashing a file.
//!
//! There is no read access while the index is shared: the buckets are only
//! reachable through [`DedupIndex::into_buckets`], which consumes the index
//! and therefore cannot run while any worker still borrows it.
//!
//! # Example
//!
//! ```
//! use sumdedup::duplicates::DedupIndex;
//! use sumdedup::scanner::{FileIdentity, FileRecord, Fingerprint};
//! use std::path::PathBuf;
//!
//! let index = DedupIndex::new();
//! let fp = Fingerprint::of_bytes(b"hello");
//! index.insert(fp, FileRecord::new(PathBuf::from("/a/x"), "x", FileIdentity::unknown()));
//! index.insert(fp, FileRecord::new(PathBuf::from("/b/y"), "y", FileIdentity::unknown()));
//!
//! let buckets = index.into_buckets();
//! assert_eq!(buckets[&fp].len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::scanner::{FileRecord, Fingerprint};

/// Fingerprint buckets in arrival order.
pub type Buckets = HashMap<Fingerprint, Vec<FileRecord>>;

/// Mutex-guarded fingerprint index for one run.
#[derive(Debug, Default)]
pub struct DedupIndex {
    buckets: Mutex<Buckets>,
}

impl DedupIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the bucket for `fingerprint`, creating the bucket
    /// if absent.
    pub fn insert(&self, fingerprint: Fingerprint, record: FileRecord) {
        self.lock().entry(fingerprint).or_default().push(record);
    }

    /// Number of buckets so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been inserted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of records across all buckets.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Consume the index and hand out its buckets.
    #[must_use]
    pub fn into_buckets(self) -> Buckets {
        // A panicking worker cannot leave a half-pushed Vec behind, so the
        // data behind a poisoned lock is still consistent.
        self.buckets
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Buckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
