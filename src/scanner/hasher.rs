//! SHA-256 content fingerprints with streaming reads.
//!
//! # Overview
//!
//! A [`Fingerprint`] is the pair `(size, digest)` of a file's content. Two
//! files share a fingerprint iff they have the same length and the same
//! SHA-256 digest. The whole byte stream is read exactly once; there is no
//! prehash, sampling or seeking.
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::scanner::hasher::fingerprint;
//! use std::path::Path;
//!
//! let fp = fingerprint(Path::new("photo.jpg")).unwrap();
//! println!("{fp}"); // e.g. "5+2cf24dba5fb0a30e..."
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::HashError;

/// SHA-256 digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// Read buffer size for streaming.
const BUFFER_SIZE: usize = 64 * 1024;

/// Raw SHA-256 digest.
pub type Hash = [u8; DIGEST_LEN];

/// Content key of a file: byte length plus SHA-256 digest.
///
/// Displays as `"{size}+{hex digest}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    /// Number of bytes streamed through the digest
    pub size: u64,
    /// SHA-256 digest of the content
    pub digest: Hash,
}

impl Fingerprint {
    /// Create a fingerprint from its parts.
    #[must_use]
    pub fn new(size: u64, digest: Hash) -> Self {
        Self { size, digest }
    }

    /// Fingerprint of an in-memory byte slice.
    ///
    /// # Example
    ///
    /// ```
    /// use sumdedup::scanner::hasher::Fingerprint;
    ///
    /// let fp = Fingerprint::of_bytes(b"hello");
    /// assert_eq!(fp.size, 5);
    /// assert!(fp.to_string().starts_with("5+2cf24dba"));
    /// ```
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self {
            size: bytes.len() as u64,
            digest: Sha256::digest(bytes).into(),
        }
    }

    /// Digest as lowercase hexadecimal.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hash_to_hex(&self.digest)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.size, self.digest_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Compute the fingerprint of the file at `path`.
///
/// Opens the file, streams every byte through SHA-256 and closes it before
/// returning.
///
/// # Errors
///
/// - `NotFound` if the file disappeared before it could be opened
/// - `PermissionDenied` if it cannot be opened for reading
/// - `Io` if opening or a read fails for any other reason
pub fn fingerprint(path: &Path) -> Result<Fingerprint, HashError> {
    let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
    fingerprint_reader(file).map_err(|e| HashError::from_io(path, e))
}

/// Stream an arbitrary reader through SHA-256.
///
/// Interrupted reads are retried; any other read error aborts and no
/// partial fingerprint is produced.
///
/// # Errors
///
/// Returns the first non-interrupt I/O error from `reader`.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<Fingerprint> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut size: u64 = 0;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
        size += n as u64;
    }

    Ok(Fingerprint {
        size,
        digest: hasher.finalize().into(),
    })
}

/// Convert a digest to a lowercase hexadecimal string.
///
/// # Example
///
/// ```
/// use sumdedup::scanner::hasher::hash_to_hex;
///
/// let hex = hash_to_hex(&[0xab; 32]);
/// assert_eq!(hex.len(), 64);
/// assert!(hex.starts_with("abab"));
/// ```
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use fmt::Write;
    hash.iter().fold(String::with_capacity(DIGEST_LEN * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}
