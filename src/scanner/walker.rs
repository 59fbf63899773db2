//! Directory walker for a single root.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which visits every entry
//! under one root with [`walkdir`] and yields a [`FileEntry`] per regular
//! file. Children are sorted by file name, so a sequential walk always
//! yields the same order.
//!
//! # Behavior
//!
//! - Directories are traversed but not yielded
//! - Symlinks are not followed and, like sockets, fifos and devices, skipped
//! - The first traversal error is yielded and ends the walk of this root
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::scanner::{PlatformIdentity, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default(), &PlatformIdentity);
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::identity::IdentityProvider;
use super::{FileEntry, FileRecord, ScanError, WalkerConfig};

/// Directory walker for one root.
pub struct Walker<'a> {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Identity lookup for each regular file
    identity: &'a dyn IdentityProvider,
}

impl std::fmt::Debug for Walker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("identity", &"<provider>")
            .finish()
    }
}

impl<'a> Walker<'a> {
    /// Create a new walker for the given root.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to walk
    /// * `config` - Walker configuration options
    /// * `identity` - Identity provider consulted for every regular file
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig, identity: &'a dyn IdentityProvider) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            identity,
        }
    }

    /// Root this walker traverses.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// A traversal error is yielded once as `Err` and nothing follows it:
    /// the walk of this root is over.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let mut aborted = false;

        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .map_while(move |entry_result| {
                if aborted {
                    return None;
                }
                let item = match entry_result {
                    Ok(entry) => self.process_entry(&entry),
                    Err(e) => Some(Err(self.handle_walkdir_error(e))),
                };
                if matches!(item, Some(Err(_))) {
                    aborted = true;
                }
                Some(item)
            })
            .flatten()
    }

    /// Turn a walkdir entry into a file entry, or `None` if it is skipped.
    fn process_entry(&self, entry: &walkdir::DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let path = entry.path();
        self.trace_visit(path);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }
        if !file_type.is_file() {
            log::trace!("Skipping non-regular entry: {}", path.display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walkdir_error(e))),
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let identity = self.identity.identity(path, &metadata);

        Some(Ok(FileEntry {
            record: FileRecord::new(path.to_path_buf(), name, identity),
            size: metadata.len(),
        }))
    }

    fn trace_visit(&self, path: &Path) {
        if self.config.detail {
            log::info!("Processing {}", path.display());
        } else {
            log::trace!("Processing {}", path.display());
        }
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        if let Some(p) = error.path() {
            self.trace_visit(p);
        }
        log::warn!("Walker error for {}: {}", path.display(), error);

        match error.into_io_error() {
            Some(io_error) => ScanError::from_io(&path, io_error),
            // Loop detection only happens when following links.
            None => ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop detected"),
            },
        }
    }
}
