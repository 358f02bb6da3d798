//! Single-shot HTTP GET of a remote archive into a destination file.
//!
//! The full response body is buffered in memory and written out in one
//! pass. No retries; transport defaults govern timeouts.

use std::fmt;
use std::path::{Path, PathBuf};

/// Error from fetching one archive.
#[derive(Debug)]
pub enum FetchError {
    /// Request could not be completed (DNS, connect, TLS, or a failure
    /// while reading the body).
    Transport { url: String, source: reqwest::Error },
    /// Server answered with a non-success status code.
    Http {
        url: String,
        status: reqwest::StatusCode,
    },
    /// Body was received but could not be written to the destination.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { url, source } => write!(f, "GET {}: {}", url, source),
            FetchError::Http { url, status } => {
                write!(f, "GET {} returned HTTP {}", url, status.as_u16())
            }
            FetchError::Write { path, source } => {
                write!(f, "write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport { source, .. } => Some(source),
            FetchError::Write { source, .. } => Some(source),
            FetchError::Http { .. } => None,
        }
    }
}

/// Fetch `url` with a single GET and write the full body to `dest`,
/// overwriting any existing file. The shared `client` keeps connections
/// pooled across the concurrent fetches of a batch.
pub async fn fetch(client: &reqwest::Client, url: &str, dest: &Path) -> Result<(), FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status,
        });
    }
    let body = response.bytes().await.map_err(transport)?;
    tokio::fs::write(dest, &body)
        .await
        .map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })?;
    tracing::debug!("downloaded {} ({} bytes) to {}", url, body.len(), dest.display());
    Ok(())
}
