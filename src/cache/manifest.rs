//! Declarative precache manifest table.
//!
//! Each entry maps a store version tag to its asset bundle. Upgrading the
//! app means appending a row; the cleanup policy is always "purge every
//! version other than the current one" at activation.

/// Version tag and asset bundle for one cache store generation.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub version: String,
    pub assets: Vec<String>,
}

/// Upgrade table, oldest first. The last row is the active manifest.
const MANIFEST_TABLE: &[(&str, &[&str])] = &[
    (
        "amor-fati-cache-v1",
        &["index.html", "manifest.json", "icons/icon-192.png", "icons/icon-512.png"],
    ),
    (
        "amor-fati-cache-v2",
        &[
            "index.html",
            "offline.html",
            "manifest.json",
            "icons/icon-192.png",
            "icons/icon-512.png",
            "icons/icon-180.png",
        ],
    ),
];

impl Manifest {
    /// The active manifest (the last table row).
    pub fn current() -> Self {
        let (version, assets) = MANIFEST_TABLE[MANIFEST_TABLE.len() - 1];
        Self {
            version: version.to_string(),
            assets: assets.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A manifest shell for an already-installed store version whose
    /// asset list is no longer known (used to keep serving an old version
    /// after a failed install).
    pub fn resumed(version: &str) -> Self {
        Self {
            version: version.to_string(),
            assets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_is_last_table_row() {
        let current = Manifest::current();
        assert_eq!(current.version, "amor-fati-cache-v2");
        assert!(current.assets.contains(&"offline.html".to_string()));
    }

    #[test]
    fn test_version_tags_are_unique() {
        let mut tags: Vec<&str> = MANIFEST_TABLE.iter().map(|(v, _)| *v).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), MANIFEST_TABLE.len());
    }
}
