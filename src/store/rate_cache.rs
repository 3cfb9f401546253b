//! JSON file holding the last good rate snapshot.

use crate::core::error::CacheError;
use crate::core::snapshot::{CachedSnapshot, RateSnapshot};
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const CACHE_FILE_NAME: &str = "rates_cache.json";

#[derive(Debug, Clone)]
pub struct RateCache {
    path: PathBuf,
}

impl RateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CACHE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last stored snapshot, or the empty snapshot if there is none or it
    /// cannot be read.
    pub fn load(&self) -> RateSnapshot {
        self.load_cached()
            .map(|cached| cached.snapshot)
            .unwrap_or_default()
    }

    pub fn load_cached(&self) -> Option<CachedSnapshot> {
        match self.try_load() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable rate cache");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<CachedSnapshot>, CacheError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No rate cache yet");
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path)?;
        let cached: CachedSnapshot = serde_json::from_slice(&bytes)?;
        debug!(saved_at = %cached.saved_at, "Loaded rate cache");
        Ok(Some(cached))
    }

    /// Replaces the cache file with `snapshot`. The new content is written to
    /// a temp file next to the target and renamed over it.
    pub fn store(&self, snapshot: &RateSnapshot) -> Result<(), CacheError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let cached = CachedSnapshot {
            snapshot: snapshot.clone(),
            saved_at: Utc::now(),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, &cached)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Stored rate cache");
        Ok(())
    }
}
