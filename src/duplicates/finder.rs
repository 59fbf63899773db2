//! Duplicate finder: validates the roots, walks them and groups the index.
//!
//! # Overview
//!
//! [`DuplicateFinder::find_duplicates_in_paths`] runs one scan:
//! 1. **Validate** every root before anything is walked
//! 2. **Walk** each root, fingerprint every regular file and insert it into a
//!    shared [`DedupIndex`]. In parallel mode each root gets its own scoped
//!    thread; otherwise roots are walked in list order on the caller's thread
//! 3. **Barrier**: all workers are joined before the index is consumed
//! 4. **Group** the buckets (see [`crate::duplicates::groups`])
//!
//! A walk failure ends only its own root, and a file that cannot be read is
//! skipped. Both are recorded in the [`ScanSummary`].
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let config = FinderConfig::default().with_parallel(true);
//! let finder = DuplicateFinder::new(config);
//!
//! let (groups, summary) = finder
//!     .find_duplicates_in_paths(vec![PathBuf::from("/a"), PathBuf::from("/b")])
//!     .unwrap();
//!
//! println!("Found {} duplicate groups", groups.len());
//! println!("Reclaimable space: {}", summary.reclaimable_display());
//! ```

use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{build_groups, DuplicateGroup, RootOrder};
use super::index::DedupIndex;
use crate::progress::ProgressCallback;
use crate::scanner::{
    fingerprint, HashError, IdentityProvider, PlatformIdentity, ScanError, Walker, WalkerConfig,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walk every root on its own thread.
    pub parallel: bool,
    /// Order bucket members by root precedence even when walking sequentially.
    pub sort: bool,
    /// Turn the first walk or read failure into an error.
    pub strict: bool,
    /// Reported in the phase announcement only; the finder never removes.
    pub dry_run: bool,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Identity lookup shared by every walker.
    pub identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("parallel", &self.parallel)
            .field("sort", &self.sort)
            .field("strict", &self.strict)
            .field("dry_run", &self.dry_run)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("identity", &"<provider>")
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            sort: false,
            strict: false,
            dry_run: false,
            walker_config: WalkerConfig::default(),
            progress_callback: None,
            identity: Arc::new(PlatformIdentity),
        }
    }
}

impl FinderConfig {
    /// Walk roots concurrently, one thread per root.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Request root-precedence ordering of bucket members.
    #[must_use]
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Set fail-fast on any error.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Record whether the caller is doing a dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Replace the platform identity provider.
    #[must_use]
    pub fn with_identity_provider(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    /// Whether bucket members get reordered after the barrier.
    #[must_use]
    pub fn orders_members(&self) -> bool {
        self.parallel || self.sort
    }
}

/// A root whose walk ended early.
#[derive(Debug)]
pub struct WalkFailure {
    /// Root that was being walked
    pub root: PathBuf,
    /// Error that ended the walk
    pub error: ScanError,
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of roots walked
    pub roots: usize,
    /// Number of files fingerprinted and indexed
    pub total_files: usize,
    /// Total bytes streamed through the digest
    pub total_size: u64,
    /// Number of distinct fingerprints
    pub buckets: usize,
    /// Records dropped as repeated visits of the same entry
    pub collapsed_entries: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding the first of each group)
    pub duplicate_files: usize,
    /// Bytes held by those duplicate files
    pub reclaimable_space: u64,
    /// Roots whose walk was cut short
    pub walk_failures: Vec<WalkFailure>,
    /// Files skipped because they could not be read
    pub hash_failures: Vec<HashError>,
    /// Files whose size changed between the directory visit and the read
    pub resized_files: usize,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize(self.total_size).to_string()
    }

    /// Number of walk and read failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.walk_failures.len() + self.hash_failures.len()
    }

    /// Whether any root or file could not be fully processed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    fn first_failure(&self) -> Option<String> {
        self.walk_failures
            .first()
            .map(|f| f.error.to_string())
            .or_else(|| self.hash_failures.first().map(ToString::to_string))
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// No roots were given.
    #[error("No paths to scan")]
    NoPaths,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A root could not be inspected.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Strict mode and at least one root or file failed.
    #[error("{failures} scan failure(s) in strict mode, first: {first}")]
    Strict {
        /// Number of recorded failures
        failures: usize,
        /// Description of the first one
        first: String,
    },
}

/// Per-root result returned by a walk worker.
#[derive(Debug, Default)]
struct RootOutcome {
    files: usize,
    bytes: u64,
    hash_failures: Vec<HashError>,
    walk_failure: Option<ScanError>,
    resized: usize,
}

impl RootOutcome {
    fn panicked(root: &Path) -> Self {
        log::error!("Worker for {} panicked", root.display());
        Self {
            walk_failure: Some(ScanError::WorkerPanicked(root.to_path_buf())),
            ..Default::default()
        }
    }
}

/// Duplicate finder that owns the configuration for a scan.
///
/// # Example
///
/// ```no_run
/// use sumdedup::duplicates::DuplicateFinder;
/// use std::path::PathBuf;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates_in_paths(vec![PathBuf::from(".")]) {
///     Ok((groups, summary)) => {
///         println!("Found {} duplicate groups", groups.len());
///         println!("Can reclaim {} bytes", summary.reclaimable_space);
///     }
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration this finder runs with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find duplicate files across every root.
    ///
    /// Roots keep their order: it decides which copy of a group comes first
    /// when members are ordered.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - `paths` is empty
    /// - a root does not exist or is not a directory (nothing is walked)
    /// - strict mode is on and a root or file failed
    pub fn find_duplicates_in_paths(
        &self,
        paths: Vec<PathBuf>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if paths.is_empty() {
            return Err(FinderError::NoPaths);
        }
        for path in &paths {
            validate_root(path)?;
        }

        log::info!("Generating sums, dryrun={}", self.config.dry_run);

        let index = DedupIndex::new();
        let outcomes = if self.config.parallel {
            self.walk_parallel(&paths, &index)
        } else {
            paths
                .iter()
                .enumerate()
                .map(|(slot, root)| self.walk_root_contained(slot, root, &index))
                .collect::<Vec<_>>()
        };

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_grouping();
        }
        log::info!("Enumerating table and printing duplicates");

        let mut summary = ScanSummary {
            roots: paths.len(),
            ..Default::default()
        };
        for (root, outcome) in paths.iter().zip(outcomes) {
            summary.total_files += outcome.files;
            summary.total_size += outcome.bytes;
            summary.hash_failures.extend(outcome.hash_failures);
            summary.resized_files += outcome.resized;
            if let Some(error) = outcome.walk_failure {
                summary.walk_failures.push(WalkFailure {
                    root: root.clone(),
                    error,
                });
            }
        }

        if self.config.strict {
            if let Some(first) = summary.first_failure() {
                return Err(FinderError::Strict {
                    failures: summary.failure_count(),
                    first,
                });
            }
        }

        let order = RootOrder::new(paths);
        let (groups, stats) =
            build_groups(index.into_buckets(), &order, self.config.orders_members());

        summary.buckets = stats.buckets;
        summary.collapsed_entries = stats.collapsed_entries;
        summary.duplicate_groups = stats.duplicate_groups;
        summary.duplicate_files = stats.duplicate_files;
        summary.reclaimable_space = stats.wasted_space;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files in {} root(s), {} duplicate groups, {} reclaimable",
            summary.total_files,
            summary.roots,
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// One scoped worker per root. Every handle is joined before returning,
    /// so `index` is no longer shared once this returns.
    fn walk_parallel(&self, roots: &[PathBuf], index: &DedupIndex) -> Vec<RootOutcome> {
        thread::scope(|scope| {
            let handles: Vec<_> = roots
                .iter()
                .enumerate()
                .map(|(slot, root)| scope.spawn(move || self.walk_root(slot, root, index)))
                .collect();

            handles
                .into_iter()
                .zip(roots)
                .map(|(handle, root)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| RootOutcome::panicked(root))
                })
                .collect()
        })
    }

    /// [`Self::walk_root`] on the calling thread, with a panic turned into a
    /// walk failure for `root` as a joined worker's would be.
    fn walk_root_contained(&self, slot: usize, root: &Path, index: &DedupIndex) -> RootOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.walk_root(slot, root, index)))
            .unwrap_or_else(|_| RootOutcome::panicked(root))
    }

    /// Walk one root, fingerprint each file and insert it into `index`.
    fn walk_root(&self, slot: usize, root: &Path, index: &DedupIndex) -> RootOutcome {
        log::info!("Generating sums on {}", root.display());
        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_root_start(slot, root);
        }

        let mut outcome = RootOutcome::default();
        let walker = Walker::new(
            root,
            self.config.walker_config.clone(),
            self.config.identity.as_ref(),
        );

        for result in walker.walk() {
            match result {
                Ok(entry) => match fingerprint(&entry.record.path) {
                    Ok(fp) => {
                        if entry.changed_since_visit(&fp) {
                            log::warn!(
                                "{} changed size while being read ({} -> {} bytes)",
                                entry.record.path.display(),
                                entry.size,
                                fp.size
                            );
                            outcome.resized += 1;
                        }
                        if let Some(cb) = callback {
                            cb.on_file_indexed(slot, &entry.record.path, fp.size);
                        }
                        outcome.files += 1;
                        outcome.bytes += fp.size;
                        index.insert(fp, entry.record);
                    }
                    Err(e) => {
                        log::warn!("Skipping unreadable file: {}", e);
                        outcome.hash_failures.push(e);
                    }
                },
                Err(e) => {
                    log::warn!("Walk of {} aborted: {}", root.display(), e);
                    outcome.walk_failure = Some(e);
                }
            }
        }

        log::debug!(
            "Finished {}: {} files, {} skipped",
            root.display(),
            outcome.files,
            outcome.hash_failures.len()
        );
        if let Some(cb) = callback {
            cb.on_root_end(slot, root, outcome.files);
        }
        outcome
    }
}

/// Check that `path` exists and is a directory.
fn validate_root(path: &Path) -> Result<(), FinderError> {
    let metadata = fs::metadata(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            FinderError::PathNotFound(path.to_path_buf())
        } else {
            FinderError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if metadata.is_dir() {
        Ok(())
    } else {
        Err(FinderError::NotADirectory(path.to_path_buf()))
    }
}
