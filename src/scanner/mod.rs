//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Sequential, name-sorted directory walking of one root using walkdir
//! - SHA-256 content fingerprints
//! - Platform file identity lookup
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming SHA-256 fingerprints
//! - [`identity`]: Device/inode (or volume/file-index) identities
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::scanner::{Walker, WalkerConfig, PlatformIdentity};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default(), &PlatformIdentity);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.record.path.display(), file.size),
//!         Err(e) => eprintln!("Walk aborted: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod identity;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

// Re-export main types
pub use hasher::{fingerprint, hash_to_hex, Fingerprint, Hash};
pub use identity::{FileIdentity, IdentityProvider, PlatformIdentity};
pub use walker::Walker;

/// One regular file visited during a walk.
///
/// Immutable once created; owned by the index bucket it lands in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Full traversal path (root joined with the relative path)
    pub path: PathBuf,
    /// Base filename component
    pub name: String,
    /// Platform identity, or the `"+"` sentinel
    pub identity: FileIdentity,
}

impl FileRecord {
    /// Create a new FileRecord.
    ///
    /// # Arguments
    ///
    /// * `path` - Full traversal path
    /// * `name` - Base filename
    /// * `identity` - Identity from an [`IdentityProvider`]
    #[must_use]
    pub fn new(path: PathBuf, name: impl Into<String>, identity: FileIdentity) -> Self {
        Self {
            path,
            name: name.into(),
            identity,
        }
    }

    /// Whether two records describe the very same filesystem entry visit:
    /// same identity, same name and same path.
    #[must_use]
    pub fn is_same_entry(&self, other: &Self) -> bool {
        self.identity == other.identity && self.name == other.name && self.path == other.path
    }
}

/// Walker output: a record plus the size its metadata reported.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// The record that will be indexed
    pub record: FileRecord,
    /// File size in bytes at visit time
    pub size: u64,
}

impl FileEntry {
    /// Whether the content read for `fingerprint` differs in length from
    /// what the directory visit reported.
    #[must_use]
    pub fn changed_since_visit(&self, fingerprint: &Fingerprint) -> bool {
        self.size != fingerprint.size
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Trace every visited entry at info level instead of trace level.
    pub detail: bool,
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `detail` - Whether to announce every visited entry
    #[must_use]
    pub fn new(detail: bool) -> Self {
        Self { detail }
    }
}

/// Errors that abort the walk of a single root.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An entry disappeared while the tree was being walked.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The worker walking this root panicked.
    #[error("Worker for {0} panicked")]
    WorkerPanicked(PathBuf),
}

impl ScanError {
    /// Classify an I/O error raised while visiting `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur while fingerprinting one file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while opening or reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that could not be fingerprinted.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
