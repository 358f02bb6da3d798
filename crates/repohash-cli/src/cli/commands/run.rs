//! Run command: fetch N archive copies into a scoped temp workspace and
//! print their digests.

use anyhow::{Context, Result};
use repohash_core::batch;
use repohash_core::config::{self, RepohashConfig};

/// Runs the full pipeline. The temp workspace is removed on every exit
/// path, including batch failure, when the `TempDir` guard drops.
pub async fn run_pipeline(
    cfg: &RepohashConfig,
    count: Option<usize>,
    url: Option<&str>,
) -> Result<()> {
    let count = count.unwrap_or(cfg.repo_count);
    let url = url.unwrap_or(&cfg.archive_url);
    config::parse_archive_url(url)?;

    let workspace = tempfile::tempdir().context("create temp workspace")?;
    tracing::info!(
        "fetching {} copies of {} into {}",
        count,
        url,
        workspace.path().display()
    );

    let digests = batch::run_batch(workspace.path(), count, url)
        .await
        .context("batch failed")?;

    for (index, digest) in digests.iter().enumerate() {
        println!("{}  {}", digest, batch::archive_name(index));
    }

    Ok(())
}
