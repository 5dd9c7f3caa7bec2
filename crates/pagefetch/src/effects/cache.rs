//! On-disk response cache.
//!
//! Each cached response is a pair of files under
//! `{root}/{scheme}/{host}{path}`: the body in `{leaf}.html` and the header
//! snapshot in `{leaf}.json`. A path ending in `/` uses the leaf `_`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pagefetch_fs::{AtomicWriteOptions, atomic_read, atomic_write, ensure_dir, plain_write};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::CacheControl;
use crate::data::{CacheEntry, Headers};

/// Leaf name for paths that end in `/`.
const INDEX_LEAF: &str = "_";
/// Metadata key holding the store time; never stored as a header.
const STORED_AT_KEY: &str = "unix";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("corrupt cache entry {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("cache key is not representable on disk: {0}")]
    UnsafeKey(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Fs(#[from] pagefetch_fs::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    #[serde(flatten)]
    headers: BTreeMap<String, String>,
    unix:    i64,
}

/// Disk cache rooted at a directory.
///
/// # Examples
///
/// ```no_run
/// use pagefetch::CacheStore;
///
/// let store = CacheStore::new("cache").atomic(false);
/// assert!(store.lookup("http", "example.org", "/").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CacheStore {
    root:   PathBuf,
    atomic: bool,
    sync:   bool,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:   root.into(),
            atomic: true,
            sync:   false,
        }
    }

    /// Write each file through a temporary sibling and rename. Default: `true`.
    #[must_use]
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// `fsync` each atomically written file before the rename. Default: `false`.
    #[must_use]
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn is_synced(&self) -> bool { self.atomic && self.sync }

    pub fn root(&self) -> &Path { &self.root }

    /// Body and metadata file paths for a key, or `None` when the key would
    /// escape the cache root.
    pub fn entry_paths(&self, scheme: &str, host: &str, path: &str) -> Option<(PathBuf, PathBuf)> {
        if !is_safe_component(scheme) || !is_safe_component(host) {
            return None;
        }

        let mut dir = self.root.join(scheme).join(host);
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let leaf = if path.is_empty() || path.ends_with('/') {
            INDEX_LEAF
        } else {
            segments.pop()?
        };

        for segment in segments {
            if !is_safe_component(segment) {
                return None;
            }
            dir.push(segment);
        }
        if !is_safe_component(leaf) {
            return None;
        }

        Some((dir.join(format!("{}.html", leaf)), dir.join(format!("{}.json", leaf))))
    }

    /// Load a cached entry. Absent and corrupt entries are both a miss; the
    /// latter is logged.
    pub fn lookup(&self, scheme: &str, host: &str, path: &str) -> Option<CacheEntry> {
        let (body_path, meta_path) = self.entry_paths(scheme, host, path)?;
        match load(&body_path, &meta_path) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Write the body file, then the metadata file, creating directories as
    /// needed.
    pub fn store(
        &self,
        scheme: &str,
        host: &str,
        path: &str,
        headers: &Headers,
        body: &[u8],
        now: i64,
    ) -> Result<(), CacheError> {
        let key = format!("{}://{}{}", scheme, host, path);
        let (body_path, meta_path) = self.entry_paths(scheme, host, path).ok_or(CacheError::UnsafeKey(key))?;

        if let Some(dir) = body_path.parent() {
            ensure_dir(dir)?;
        }

        let metadata = Metadata {
            headers: headers
                .iter()
                .filter(|(name, _)| *name != STORED_AT_KEY)
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            unix:    now,
        };
        let json = serde_json::to_vec(&metadata)?;

        self.write(&body_path, body)?;
        self.write(&meta_path, &json)?;
        debug!(path = %body_path.display(), bytes = body.len(), "cache entry written");
        Ok(())
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<(), CacheError> {
        if self.atomic {
            atomic_write(path, content, AtomicWriteOptions::new().sync(self.sync))?;
        } else {
            plain_write(path, content)?;
        }
        Ok(())
    }
}

fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\', '\0'])
}

fn load(body_path: &Path, meta_path: &Path) -> Result<Option<CacheEntry>, CacheError> {
    let raw = match atomic_read(meta_path) {
        Ok(raw) => raw,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let corrupt = |reason: String| CacheError::Corrupt {
        path: meta_path.to_path_buf(),
        reason,
    };
    let metadata: Metadata = serde_json::from_slice(&raw).map_err(|e| corrupt(e.to_string()))?;
    let body = atomic_read(body_path).map_err(|e| corrupt(e.to_string()))?;

    let headers: Headers = metadata.headers.into_iter().collect();
    let max_age = CacheControl::from_headers(&headers).and_then(|control| control.max_age);

    Ok(Some(CacheEntry {
        stored_at: metadata.unix,
        max_age,
        headers,
        body,
    }))
}
