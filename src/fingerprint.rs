//! Content fingerprints for change detection.
//!
//! A fingerprint summarizes the file contents of a tree in one digest:
//! hash every file, sort the per-file digests, concatenate them, hash again.
//! Paths and names do not enter the digest, so two trees holding the same
//! contents under different names fingerprint identically.
//!
//! The local and remote sides run the same combining step, so they are
//! comparable as long as both use MD5 per file.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use md5::{Digest, Md5};

use crate::transfer::{SyncTool, TransferError};

/// Combined digest of a tree's file contents, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Combine per-file content digests into one fingerprint.
    ///
    /// Order-independent: the digests are sorted before combining.
    pub fn combine(mut digests: Vec<String>) -> Self {
        digests.sort_unstable();
        Self(hex::encode(Md5::digest(digests.concat().as_bytes())))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a fingerprint could not be computed.
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list remote {endpoint}: {source}")]
    Listing {
        endpoint: String,
        #[source]
        source: TransferError,
    },

    #[error("remote {endpoint} reported a file without a content hash")]
    MissingRemoteHash { endpoint: String },
}

/// Every regular file under `root`, lazily, in walk order.
///
/// Nothing is filtered: hidden files and ignore files are backed up too.
/// Symlinks are not followed.
pub fn tree_files(root: &Path) -> impl Iterator<Item = Result<PathBuf, FingerprintError>> {
    let owned_root = root.to_path_buf();
    WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build()
        .filter_map(move |entry| match entry {
            Ok(entry) => entry
                .file_type()
                .is_some_and(|ft| ft.is_file())
                .then(|| Ok(entry.into_path())),
            Err(source) => Some(Err(FingerprintError::Walk {
                root: owned_root.clone(),
                source,
            })),
        })
}

/// MD5 of one file's bytes, hex-encoded.
pub fn file_digest(path: &Path) -> Result<String, FingerprintError> {
    let read_err = |source| FingerprintError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::open(path).map_err(read_err)?;
    let mut hasher = Md5::new();
    io::copy(&mut file, &mut hasher).map_err(read_err)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint a local directory tree.
///
/// Any unreadable file or directory fails the whole fingerprint.
pub fn local_fingerprint(root: &Path) -> Result<Fingerprint, FingerprintError> {
    let digests = tree_files(root)
        .map(|path| file_digest(&path?))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Fingerprint::combine(digests))
}

/// Fingerprint a remote endpoint from the tool's hash listing.
pub fn remote_fingerprint(
    tool: &impl SyncTool,
    endpoint: &str,
) -> Result<Fingerprint, FingerprintError> {
    let hashes = tool
        .list_hashes(endpoint)
        .map_err(|source| FingerprintError::Listing {
            endpoint: endpoint.to_string(),
            source,
        })?;

    if hashes.iter().any(String::is_empty) {
        return Err(FingerprintError::MissingRemoteHash {
            endpoint: endpoint.to_string(),
        });
    }

    Ok(Fingerprint::combine(hashes))
}

/// Whether the two sides need a transfer.
///
/// A side that couldn't be fingerprinted counts as changed, so the
/// transfer is attempted rather than silently skipped.
pub fn changed(local: Option<&Fingerprint>, remote: Option<&Fingerprint>) -> bool {
    match (local, remote) {
        (Some(local), Some(remote)) => local != remote,
        _ => true,
    }
}
