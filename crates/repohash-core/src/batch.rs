//! Two-phase fetch/digest batch orchestrator.
//!
//! Phase one fans out one download task per index; phase two starts
//! only after every download has completed, and fans out one digest
//! task per index. Digests are returned in index order regardless of
//! completion order within a phase. The first failure in a phase aborts
//! the remaining sibling tasks and fails the batch; no partial results.
//!
//! Every task in a batch downloads the same URL into its own
//! `repo_{index}.zip`. That mirrors the deployed behavior (N copies of
//! one archive) and is intentional.

use std::fmt;
use std::path::Path;

use tokio::task::JoinSet;

use crate::digest::{self, DigestError};
use crate::fetch::{self, FetchError};

/// Destination filename for a task index.
pub fn archive_name(index: usize) -> String {
    format!("repo_{}.zip", index)
}

/// Error from a batch run, carrying the index of the task that failed
/// first where one is responsible.
#[derive(Debug)]
pub enum BatchError {
    /// Shared HTTP client could not be built (e.g. TLS backend init).
    Client(reqwest::Error),
    /// A download task failed; the fetch phase was aborted.
    Fetch { index: usize, source: FetchError },
    /// A digest task failed; the digest phase was aborted.
    Digest { index: usize, source: DigestError },
    /// A spawned task panicked or was cancelled by the runtime.
    Join(tokio::task::JoinError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Client(e) => write!(f, "http client: {}", e),
            BatchError::Fetch { index, source } => {
                write!(f, "fetch task {}: {}", index, source)
            }
            BatchError::Digest { index, source } => {
                write!(f, "digest task {}: {}", index, source)
            }
            BatchError::Join(e) => write!(f, "task join: {}", e),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Client(e) => Some(e),
            BatchError::Fetch { source, .. } => Some(source),
            BatchError::Digest { source, .. } => Some(source),
            BatchError::Join(e) => Some(e),
        }
    }
}

/// Fetch phase: download `count` copies of `url` into `workspace`, one
/// concurrent task per index. Returns only once every task has
/// completed. On the first failure the remaining tasks are aborted and
/// the error is returned; files already written are left for the
/// caller's workspace cleanup.
pub async fn fetch_all(
    client: &reqwest::Client,
    workspace: &Path,
    count: usize,
    url: &str,
) -> Result<(), BatchError> {
    let mut tasks = JoinSet::new();
    for index in 0..count {
        let client = client.clone();
        let url = url.to_string();
        let dest = workspace.join(archive_name(index));
        tasks.spawn(async move {
            fetch::fetch(&client, &url, &dest)
                .await
                .map_err(|source| BatchError::Fetch { index, source })
        });
    }
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tasks.abort_all();
                return Err(e);
            }
            Err(e) => {
                tasks.abort_all();
                return Err(BatchError::Join(e));
            }
        }
    }
    Ok(())
}

/// Digest phase: compute SHA-256 of each `repo_{index}.zip` in
/// `workspace` concurrently on the blocking pool. Results come back in
/// index order regardless of which task finished first.
pub async fn digest_all(workspace: &Path, count: usize) -> Result<Vec<String>, BatchError> {
    let mut tasks = JoinSet::new();
    for index in 0..count {
        let path = workspace.join(archive_name(index));
        tasks.spawn_blocking(move || {
            digest::sha256_path(&path)
                .map(|digest| (index, digest))
                .map_err(|source| BatchError::Digest { index, source })
        });
    }
    let mut digests: Vec<(usize, String)> = Vec::with_capacity(count);
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(pair)) => digests.push(pair),
            Ok(Err(e)) => {
                tasks.abort_all();
                return Err(e);
            }
            Err(e) => {
                tasks.abort_all();
                return Err(BatchError::Join(e));
            }
        }
    }
    digests.sort_unstable_by_key(|(index, _)| *index);
    Ok(digests.into_iter().map(|(_, digest)| digest).collect())
}

/// Run the full pipeline: fetch `count` archives into `workspace`, then
/// digest them. The HTTP client is built here, shared by every fetch
/// task for connection reuse, and dropped when the batch ends. The
/// digest phase starts only after the fetch phase has fully completed.
pub async fn run_batch(
    workspace: &Path,
    count: usize,
    url: &str,
) -> Result<Vec<String>, BatchError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(BatchError::Client)?;

    fetch_all(&client, workspace, count, url).await?;
    let digests = digest_all(workspace, count).await?;

    for (index, digest) in digests.iter().enumerate() {
        tracing::info!("SHA256 for {}: {}", archive_name(index), digest);
    }
    Ok(digests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_name_embeds_index() {
        assert_eq!(archive_name(0), "repo_0.zip");
        assert_eq!(archive_name(12), "repo_12.zip");
    }
}
