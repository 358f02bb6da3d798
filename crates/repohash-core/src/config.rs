use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Archive downloaded by default: the project-configuration repo's
/// master branch as a zip.
const DEFAULT_ARCHIVE_URL: &str =
    "https://gitea.radium.group/radium/project-configuration/archive/master.zip";

const DEFAULT_REPO_COUNT: usize = 3;

/// Global configuration loaded from `~/.config/repohash/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepohashConfig {
    /// URL of the archive every task in a batch downloads.
    pub archive_url: String,
    /// Number of copies to fetch and digest per run.
    pub repo_count: usize,
}

impl Default for RepohashConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            repo_count: DEFAULT_REPO_COUNT,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("repohash")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RepohashConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RepohashConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RepohashConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Validate the archive locator before a run. Only http(s) URLs are
/// accepted; anything else fails here rather than deep in a fetch task.
pub fn parse_archive_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid archive URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("unsupported URL scheme '{}' in {}", other, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RepohashConfig::default();
        assert_eq!(cfg.archive_url, DEFAULT_ARCHIVE_URL);
        assert_eq!(cfg.repo_count, 3);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RepohashConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RepohashConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.archive_url, cfg.archive_url);
        assert_eq!(parsed.repo_count, cfg.repo_count);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            archive_url = "https://example.com/archive.zip"
            repo_count = 7
        "#;
        let cfg: RepohashConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.archive_url, "https://example.com/archive.zip");
        assert_eq!(cfg.repo_count, 7);
    }

    #[test]
    fn parse_archive_url_accepts_https() {
        assert!(parse_archive_url("https://example.com/a.zip").is_ok());
        assert!(parse_archive_url("http://127.0.0.1:8080/").is_ok());
    }

    #[test]
    fn parse_archive_url_rejects_garbage() {
        assert!(parse_archive_url("not a url").is_err());
        assert!(parse_archive_url("ftp://example.com/a.zip").is_err());
    }
}
