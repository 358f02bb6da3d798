//! SHA-256 digests of downloaded archives.
//!
//! Digests are computed after the fetch phase completes, never inline
//! with the download path.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const CHUNK_SIZE: usize = 8192;

/// Error from digesting a single file: the file could not be opened or
/// a read failed partway through.
#[derive(Debug)]
pub struct DigestError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digest {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for DigestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in fixed-size chunks to keep memory use bounded; suitable for
/// arbitrarily large files.
pub fn sha256_path(path: &Path) -> Result<String, DigestError> {
    let err = |source| DigestError {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(err)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
