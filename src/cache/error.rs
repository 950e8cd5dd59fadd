use thiserror::Error;

use super::fetch::FetchError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The all-or-nothing precache transition failed; the manager stays
    /// on its previous version.
    #[error("precache of {url} failed: {source}")]
    Precache { url: String, source: FetchError },
}
