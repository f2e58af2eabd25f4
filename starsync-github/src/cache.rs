//! Local star snapshot, used to avoid the GitHub rate limit while iterating.
//!
//! ```text
//! ~/.starsync/cache/stars-<login>.json
//! ```
//!
//! If the file exists (and was written for the same login) its stars are
//! returned as-is; otherwise the wrapped fetcher runs and its result is
//! saved. Saving is atomic: `.json.tmp` sibling → `chmod 0600` → `rename`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use starsync_core::StarRecord;

use crate::error::{io_err, CacheError, FetchError};
use crate::fetch::StarFetcher;

/// On-disk layout of a star snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarCache {
    pub login: String,
    pub fetched_at: DateTime<Utc>,
    pub stars: Vec<StarRecord>,
}

/// `<home>/.starsync/cache/stars-<login>.json`. Pure, no I/O.
pub fn cache_path_at(home: &Path, login: &str) -> PathBuf {
    home.join(".starsync")
        .join("cache")
        .join(format!("stars-{login}.json"))
}

/// `cache_path_at` convenience wrapper.
pub fn cache_path(login: &str) -> Result<PathBuf, CacheError> {
    let home = dirs::home_dir().ok_or(CacheError::HomeNotFound)?;
    Ok(cache_path_at(&home, login))
}

/// Load the snapshot at `path`, or `None` if the file does not exist.
pub fn load(path: &Path) -> Result<Option<StarCache>, CacheError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(path, e)),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| CacheError::Format {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Atomically write `cache` to `path`, creating parent directories.
pub fn save(path: &Path, cache: &StarCache) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let json = serde_json::to_string_pretty(cache).map_err(|e| CacheError::Format {
        path: path.to_path_buf(),
        source: e,
    })?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// [`StarFetcher`] that serves stars from a snapshot file when present.
pub struct CachedFetcher<F> {
    inner: F,
    path: PathBuf,
}

impl<F: StarFetcher> CachedFetcher<F> {
    pub fn new(inner: F, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }
}

impl<F: StarFetcher> StarFetcher for CachedFetcher<F> {
    fn fetch_stars(&self, login: &str) -> Result<Vec<StarRecord>, FetchError> {
        match load(&self.path)? {
            Some(cache) if cache.login == login => {
                tracing::info!(
                    path = %self.path.display(),
                    stars = cache.stars.len(),
                    fetched_at = %cache.fetched_at,
                    "loaded stars from cache"
                );
                return Ok(cache.stars);
            }
            Some(cache) => tracing::info!(
                path = %self.path.display(),
                cached_for = %cache.login,
                "cache belongs to another user; refreshing"
            ),
            None => {}
        }

        let stars = self.inner.fetch_stars(login)?;
        save(
            &self.path,
            &StarCache {
                login: login.to_string(),
                fetched_at: Utc::now(),
                stars: stars.clone(),
            },
        )?;
        tracing::info!(path = %self.path.display(), stars = stars.len(), "cached stars");
        Ok(stars)
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), CacheError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), CacheError> {
    Ok(())
}
