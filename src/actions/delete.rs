//! File removal: executes a [`ResolutionPlan`].
//!
//! # Overview
//!
//! Every marked member is removed independently, either unlinked or moved to
//! the system trash. A failure is recorded for its own record and the
//! remaining removals still run. In a dry run nothing is touched and every
//! marked member is reported as skipped.
//!
//! A marked member whose canonical path is that of a retained member of the
//! same group (one directory reached through two spellings) is never
//! removed: it is recorded as [`DeleteError::AliasOfRetained`].
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::actions::delete::permanent_delete;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! match permanent_delete(&path) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use thiserror::Error;

use super::resolve::{PlannedGroup, ResolutionPlan};

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// The marked path names the same file as a retained member.
    #[error("refusing to remove {path}: same file as retained {retained}")]
    AliasOfRetained { path: PathBuf, retained: PathBuf },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::AliasOfRetained { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_metadata(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Result of a successful deletion operation.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, permanent: bool) -> Self {
        Self {
            path,
            size,
            permanent,
        }
    }
}

/// What happened to one marked member.
#[derive(Debug)]
pub enum RemovalOutcome {
    /// The file was removed.
    Removed(DeleteResult),
    /// Dry run: the file would have been removed.
    Skipped(PathBuf),
    /// Removal was attempted and failed.
    Failed(DeleteError),
}

impl RemovalOutcome {
    /// Path of the member this outcome is for.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Removed(r) => &r.path,
            Self::Skipped(p) => p,
            Self::Failed(e) => e.path(),
        }
    }
}

/// Per-record outcomes of executing a plan.
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// One outcome per marked member, in plan order.
    pub outcomes: Vec<RemovalOutcome>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl RemovalReport {
    /// Number of files removed.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RemovalOutcome::Removed(_)))
            .count()
    }

    /// Number of removals skipped by a dry run.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RemovalOutcome::Skipped(_)))
            .count()
    }

    /// Number of failed removals.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Failed removals.
    pub fn failures(&self) -> impl Iterator<Item = &DeleteError> {
        self.outcomes.iter().filter_map(|o| match o {
            RemovalOutcome::Failed(e) => Some(e),
            _ => None,
        })
    }

    /// Check if all removals succeeded (or were skipped).
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let skipped = self.skipped_count();
        if skipped > 0 {
            format!("Dry run: {} file(s) would be removed", skipped)
        } else if self.all_succeeded() {
            format!(
                "Removed {} file(s), freed {}",
                self.success_count(),
                ByteSize(self.bytes_freed)
            )
        } else {
            format!(
                "Removed {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                ByteSize(self.bytes_freed)
            )
        }
    }
}

/// Delete a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::symlink_metadata(path)
        .map_err(|e| DeleteError::from_metadata(path, e))?
        .len();

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `PermanentDeleteFailed` if the unlink fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::symlink_metadata(path)
        .map_err(|e| DeleteError::from_metadata(path, e))?
        .len();

    fs::remove_file(path).map_err(|e| DeleteError::PermanentDeleteFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Remove every member the plan marked.
///
/// Each removal is independent; a failure is logged, recorded and the next
/// member is processed. With `dry_run` set nothing is removed. A marked
/// member that resolves to the same file as a retained member fails with
/// [`DeleteError::AliasOfRetained`], in dry runs too.
#[must_use]
pub fn execute(plan: &ResolutionPlan) -> RemovalReport {
    let mut report = RemovalReport::default();
    let policy = plan.policy;

    for group in &plan.groups {
        let retained = retained_canonical_paths(group);

        for record in group.marked() {
            let path = &record.path;

            if let Some(kept) = alias_of(path, &retained) {
                let e = DeleteError::AliasOfRetained {
                    path: path.clone(),
                    retained: kept.to_path_buf(),
                };
                log::error!("{}", e);
                report.outcomes.push(RemovalOutcome::Failed(e));
                continue;
            }

            if policy.dry_run {
                log::debug!("Dry run, not removing {}", path.display());
                report.outcomes.push(RemovalOutcome::Skipped(path.clone()));
                continue;
            }

            let result = if policy.use_trash {
                delete_to_trash(path)
            } else {
                permanent_delete(path)
            };

            match result {
                Ok(removed) => {
                    report.bytes_freed += removed.size;
                    report.outcomes.push(RemovalOutcome::Removed(removed));
                }
                Err(e) => {
                    log::error!("Failed to remove {}: {}", path.display(), e);
                    report.outcomes.push(RemovalOutcome::Failed(e));
                }
            }
        }
    }

    if !report.outcomes.is_empty() {
        log::info!("{}", report.summary());
    }

    report
}

/// Canonical path of every retained member, paired with its spelling in
/// the plan. Members that cannot be resolved are left out.
fn retained_canonical_paths(group: &PlannedGroup) -> Vec<(PathBuf, &Path)> {
    group
        .members
        .iter()
        .filter(|m| !m.disposition.is_remove())
        .filter_map(|m| {
            fs::canonicalize(&m.record.path)
                .ok()
                .map(|canonical| (canonical, m.record.path.as_path()))
        })
        .collect()
}

/// The retained member `path` is another spelling of, if any.
fn alias_of<'a>(path: &Path, retained: &[(PathBuf, &'a Path)]) -> Option<&'a Path> {
    let canonical = fs::canonicalize(path).ok()?;
    retained
        .iter()
        .find(|(kept, _)| *kept == canonical)
        .map(|&(_, spelling)| spelling)
}
