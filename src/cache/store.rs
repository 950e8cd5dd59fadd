//! Versioned on-disk store for captured responses.
//!
//! Entries live under `root/<version>/<key>.json`, keyed by a digest of
//! the request identity (method + URL). Individual writes are atomic
//! (temp file + rename); the precache install stages a whole version
//! directory and commits it with a single rename.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::CacheError;
use super::fetch::FetchedResponse;

/// Suffix for staging directories, excluded from version enumeration.
const STAGING_SUFFIX: &str = ".staging";

/// A captured response, keyed by request identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Capture a fetched response under the request it answered.
    pub fn capture(method: &str, url: &str, response: &FetchedResponse) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            status: response.status,
            content_type: response.content_type.clone(),
            body: response.body.clone(),
            stored_at: Utc::now(),
        }
    }
}

/// Stable file name for a request identity.
fn entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b" ");
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}

/// One version of the named cache store.
pub struct CacheStore {
    root: PathBuf,
    version: String,
}

impl CacheStore {
    /// Open a store version. The version directory is created lazily on
    /// first write so an un-installed version stays detectable.
    pub fn open(root: &Path, version: &str) -> Result<Self, CacheError> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            version: version.to_string(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn version_dir(&self) -> PathBuf {
        self.root.join(&self.version)
    }

    fn entry_path(&self, method: &str, url: &str) -> PathBuf {
        self.version_dir().join(format!("{}.json", entry_key(method, url)))
    }

    /// Whether this version has been committed to disk.
    pub fn is_installed(&self) -> bool {
        self.version_dir().is_dir()
    }

    pub fn get(&self, method: &str, url: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(method, url);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Store an entry. Atomic at the single-entry level: written to a
    /// temp file and renamed into place.
    pub fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let dir = self.version_dir();
        std::fs::create_dir_all(&dir)?;
        let path = self.entry_path(&entry.method, &entry.url);
        write_entry(&dir, &path, entry)
    }

    /// Begin an all-or-nothing install of this version.
    pub fn stage(&self) -> Result<StagingStore, CacheError> {
        let dir = self.root.join(format!("{}{}", self.version, STAGING_SUFFIX));
        if dir.exists() {
            // Leftover from an aborted install
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;
        Ok(StagingStore {
            dir,
            final_dir: self.version_dir(),
        })
    }

    /// Enumerate committed store versions under a root.
    pub fn list_versions(root: &Path) -> Result<Vec<String>, CacheError> {
        if !root.exists() {
            return Ok(Vec::new());
        }
        let mut versions = Vec::new();
        for dir_entry in std::fs::read_dir(root)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_dir() {
                continue;
            }
            let name = dir_entry.file_name().to_string_lossy().to_string();
            if !name.ends_with(STAGING_SUFFIX) {
                versions.push(name);
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Delete every committed version whose tag differs from this one.
    /// Returns the removed tags.
    pub fn purge_other_versions(&self) -> Result<Vec<String>, CacheError> {
        let mut removed = Vec::new();
        for version in Self::list_versions(&self.root)? {
            if version != self.version {
                debug!(%version, "Removing stale cache version");
                std::fs::remove_dir_all(self.root.join(&version))?;
                removed.push(version);
            }
        }
        Ok(removed)
    }
}

/// A staged (not yet committed) version directory.
pub struct StagingStore {
    dir: PathBuf,
    final_dir: PathBuf,
}

impl StagingStore {
    pub fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let path = self.dir.join(format!("{}.json", entry_key(&entry.method, &entry.url)));
        write_entry(&self.dir, &path, entry)
    }

    /// Commit the staged directory as the version store.
    pub fn commit(self) -> Result<(), CacheError> {
        if self.final_dir.exists() {
            std::fs::remove_dir_all(&self.final_dir)?;
        }
        std::fs::rename(&self.dir, &self.final_dir)?;
        Ok(())
    }

    /// Discard the staged directory, best effort.
    pub fn abort(self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn write_entry(dir: &Path, path: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
    let contents = serde_json::to_string(entry)?;
    let tmp = dir.join(format!(
        ".{}.tmp",
        path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
    ));
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> FetchedResponse {
        FetchedResponse {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_put_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path(), "v1").unwrap();

        store
            .put(&CacheEntry::capture("GET", "index.html", &response("<h1>hi</h1>")))
            .unwrap();

        let entry = store.get("GET", "index.html").unwrap().unwrap();
        assert_eq!(entry.body, b"<h1>hi</h1>");
        assert_eq!(entry.status, 200);

        // Identity includes the method
        assert!(store.get("POST", "index.html").unwrap().is_none());
        assert!(store.get("GET", "other.html").unwrap().is_none());
    }

    #[test]
    fn test_open_does_not_install() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path(), "v1").unwrap();
        assert!(!store.is_installed());
        assert!(CacheStore::list_versions(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_staging_commit_and_abort() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path(), "v2").unwrap();

        let staging = store.stage().unwrap();
        staging
            .put(&CacheEntry::capture("GET", "a.css", &response("body{}")))
            .unwrap();
        // Nothing visible before commit
        assert!(!store.is_installed());
        assert!(CacheStore::list_versions(dir.path()).unwrap().is_empty());

        staging.commit().unwrap();
        assert!(store.is_installed());
        assert!(store.get("GET", "a.css").unwrap().is_some());

        // Aborted staging leaves no trace
        let staging = store.stage().unwrap();
        staging.abort();
        assert_eq!(CacheStore::list_versions(dir.path()).unwrap(), vec!["v2"]);
    }

    #[test]
    fn test_purge_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let old = CacheStore::open(dir.path(), "v1").unwrap();
        old.put(&CacheEntry::capture("GET", "x", &response("old"))).unwrap();
        let current = CacheStore::open(dir.path(), "v2").unwrap();
        current.put(&CacheEntry::capture("GET", "x", &response("new"))).unwrap();

        let removed = current.purge_other_versions().unwrap();
        assert_eq!(removed, vec!["v1"]);
        assert_eq!(CacheStore::list_versions(dir.path()).unwrap(), vec!["v2"]);
        assert!(old.get("GET", "x").unwrap().is_none());
        assert_eq!(current.get("GET", "x").unwrap().unwrap().body, b"new");
    }
}
