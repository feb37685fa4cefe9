//! The `BlobStore` trait -- the adapter interface for blob backends.
//!
//! Each concrete backend (the hosted HTTP store, the in-memory store used in
//! tests) implements this trait. The trait is intentionally object-safe so a
//! store can be held as `Arc<dyn BlobStore>` by the plan service.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a blob backend.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The client could not be built from the given configuration.
    #[error("blob store is not configured: {0}")]
    Unconfigured(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("blob request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("blob backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// The backend answered 2xx but the body did not have the expected shape.
    #[error("malformed blob backend response: {0}")]
    InvalidResponse(String),
}

/// A single object in the namespace, as reported by `list` or `put`.
///
/// `pathname` is the full key including the prefix (e.g. `plans/1700.json`);
/// `url` is an opaque fetch/delete handle whose scheme belongs to the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobObject {
    pub pathname: String,
    pub url: String,
}

/// Adapter interface for a flat key-value blob namespace.
///
/// # Object Safety
///
/// This trait is object-safe: every method returns a concrete type. Callers
/// hold implementations as `Arc<dyn BlobStore>`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Human-readable name for this backend (e.g. "http", "memory").
    fn name(&self) -> &str;

    /// Enumerate all objects whose pathname starts with `prefix`.
    ///
    /// No ordering is guaranteed; callers must sort the results themselves.
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobError>;

    /// Download an object's content by the `url` reported in a [`BlobObject`].
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BlobError>;

    /// Create or overwrite the object at `pathname`.
    ///
    /// Overwrite is silent -- there is no version check, so concurrent
    /// writers to the same pathname race with last-write-wins semantics.
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobObject, BlobError>;

    /// Remove the object behind `url`. Deleting an already-absent object is
    /// not an error.
    async fn delete(&self, url: &str) -> Result<(), BlobError>;
}

// Compile-time assertion: BlobStore must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn BlobStore) {}
};
