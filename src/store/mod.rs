//! Durable storage for the application state blob.
//!
//! The whole `AppData` state is held in memory and mirrored to a single
//! JSON file on every mutation. Export/import round-trip the same blob
//! through user-chosen files.

pub mod data_store;

pub use data_store::DataStore;
