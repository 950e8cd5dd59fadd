//! Offline asset cache: versioned storage, precache install, request
//! routing, and the page/worker upgrade channel.

pub mod channel;
pub mod error;
pub mod fetch;
pub mod manager;
pub mod manifest;
pub mod store;

pub use channel::{channel, PageHandle, WorkerMessage};
pub use fetch::{AssetRequest, HttpFetcher};
pub use manager::{run_worker, Intercept};
