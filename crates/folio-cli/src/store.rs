//! Locating and opening the local datastore.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use folio_core::{Datastore, SiteConfig};
use folio_file::FileStore;

/// Environment variable naming the data directory.
pub const DATA_ENV: &str = "FOLIO_DATA";

/// Build timestamp of this binary, stamped as `version` on new records.
pub fn build_version() -> Option<i64> {
    env!("FOLIO_BUILD_TIMESTAMP").parse().ok()
}

/// Resolve the data directory: `--data`, then `$FOLIO_DATA`, then the
/// platform data directory.
pub fn data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let dirs =
        ProjectDirs::from("", "", "folio").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Open the store, creating its directory if needed.
pub fn open(flag: Option<PathBuf>) -> Result<FileStore> {
    let dir = data_dir(flag)?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    debug!(path = %dir.display(), "Opened datastore");
    let store = FileStore::new(dir);
    Ok(match build_version() {
        Some(version) => store.with_version(version),
        None => store,
    })
}

/// Site configuration from the `master` config record, or defaults.
pub async fn site_config(store: &FileStore) -> Result<SiteConfig> {
    let record = store
        .get(&SiteConfig::master_key())
        .await
        .context("Failed to read site configuration")?;
    Ok(SiteConfig::from_optional(record.as_ref()))
}
