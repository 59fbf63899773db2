//! Filesystem identity lookup for exact-entry deduplication.
//!
//! # Overview
//!
//! Two directory entries denote the same underlying file when they share an
//! identity. The engine never interprets an identity; it only compares them,
//! so identities are carried as opaque strings.
//!
//! # Platform Support
//!
//! - **Unix**: `"<dev>+<ino>"` from file metadata
//! - **Windows**: `"<volume serial>+<index high>-<index low>"` from an open handle
//! - **Other**: the unknown sentinel `"+"`
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::scanner::identity::{IdentityProvider, PlatformIdentity};
//! use std::path::Path;
//!
//! let path = Path::new("/some/file.txt");
//! let metadata = std::fs::metadata(path).unwrap();
//! let identity = PlatformIdentity.identity(path, &metadata);
//! println!("{} -> {}", path.display(), identity);
//! ```

use std::fmt;
use std::fs::Metadata;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Opaque, comparable identity of a filesystem entry.
///
/// Equal for two paths iff they denote the same entry on this platform.
/// [`FileIdentity::UNKNOWN`] is used when the platform cannot tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileIdentity(String);

impl FileIdentity {
    /// Sentinel for "identity could not be determined".
    pub const UNKNOWN: &'static str = "+";

    /// Wrap a platform identity string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The unknown sentinel.
    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// Whether this is the unknown sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// Identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a path to its filesystem identity.
///
/// Implementations must never fail: when the identity cannot be
/// determined they return [`FileIdentity::unknown`].
pub trait IdentityProvider: Send + Sync {
    /// Identity of the entry at `path`, whose metadata was already read
    /// by the walker.
    fn identity(&self, path: &Path, metadata: &Metadata) -> FileIdentity;
}

/// Identity provider backed by the host platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformIdentity;

impl PlatformIdentity {
    /// Check if identity lookup is supported on this platform.
    ///
    /// # Example
    ///
    /// ```
    /// use sumdedup::scanner::identity::PlatformIdentity;
    ///
    /// if PlatformIdentity::is_supported() {
    ///     println!("Hardlinks share an identity here");
    /// }
    /// ```
    #[must_use]
    pub const fn is_supported() -> bool {
        cfg!(any(unix, windows))
    }
}

impl IdentityProvider for PlatformIdentity {
    #[cfg(unix)]
    fn identity(&self, _path: &Path, metadata: &Metadata) -> FileIdentity {
        use std::os::unix::fs::MetadataExt;
        FileIdentity(format!("{}+{}", metadata.dev(), metadata.ino()))
    }

    #[cfg(windows)]
    fn identity(&self, path: &Path, _metadata: &Metadata) -> FileIdentity {
        // std does not expose the file index on stable, so open a handle.
        windows_file_id(path).map_or_else(FileIdentity::unknown, |(volume, high, low)| {
            FileIdentity(format!("{volume}+{high}-{low}"))
        })
    }

    #[cfg(not(any(unix, windows)))]
    fn identity(&self, _path: &Path, _metadata: &Metadata) -> FileIdentity {
        FileIdentity::unknown()
    }
}

/// Volume serial number and file index of `path`, or `None` if the file
/// cannot be opened or queried.
#[cfg(windows)]
fn windows_file_id(path: &Path) -> Option<(u32, u32, u32)> {
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;
    use winapi::um::fileapi::{
        CreateFileW, GetFileInformationByHandle, BY_HANDLE_FILE_INFORMATION, OPEN_EXISTING,
    };
    use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
    use winapi::um::winnt::{FILE_ATTRIBUTE_NORMAL, FILE_SHARE_READ, FILE_SHARE_WRITE};

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: `wide` is NUL-terminated and outlives the call; the handle is
    // closed on every path after a successful open.
    unsafe {
        let handle = CreateFileW(
            wide.as_ptr(),
            0,
            FILE_SHARE_READ | FILE_SHARE_WRITE,
            ptr::null_mut(),
            OPEN_EXISTING,
            FILE_ATTRIBUTE_NORMAL,
            ptr::null_mut(),
        );
        if handle == INVALID_HANDLE_VALUE {
            log::debug!("Cannot open {} for identity lookup", path.display());
            return None;
        }

        let mut info: BY_HANDLE_FILE_INFORMATION = std::mem::zeroed();
        let ok = GetFileInformationByHandle(handle, &mut info) != 0;
        CloseHandle(handle);

        if ok {
            Some((
                info.dwVolumeSerialNumber,
                info.nFileIndexHigh,
                info.nFileIndexLow,
            ))
        } else {
            None
        }
    }
}
