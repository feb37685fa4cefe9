//! Blob-backend clients for tabi.
//!
//! Saved itineraries live as JSON documents in a flat blob namespace where
//! every key shares one prefix (`plans/` by default). This crate defines the
//! [`BlobStore`] adapter trait plus two implementations: [`HttpBlobStore`]
//! for a Vercel-Blob-style REST backend and [`MemoryBlobStore`] for tests
//! and offline runs.

pub mod config;
pub mod http;
pub mod memory;
pub mod trait_def;

pub use config::BlobConfig;
pub use http::HttpBlobStore;
pub use memory::MemoryBlobStore;
pub use trait_def::{BlobError, BlobObject, BlobStore};
