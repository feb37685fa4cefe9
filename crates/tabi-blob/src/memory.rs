//! In-memory blob store.
//!
//! Backs tests and offline runs with a `BTreeMap` behind an async lock.
//! Object URLs use a `memory://` scheme so the fetch/delete-by-url contract
//! works exactly as it does against the hosted store.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::trait_def::{BlobError, BlobObject, BlobStore};

const URL_SCHEME: &str = "memory://";

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

/// A process-local [`BlobStore`] keyed by pathname.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects (test convenience).
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// `true` when the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Content type recorded for `pathname`, if present.
    pub async fn content_type_of(&self, pathname: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(pathname)
            .map(|o| o.content_type.clone())
    }

    fn url_for(pathname: &str) -> String {
        format!("{URL_SCHEME}{pathname}")
    }

    fn pathname_of(url: &str) -> Result<&str, BlobError> {
        url.strip_prefix(URL_SCHEME).ok_or_else(|| {
            BlobError::InvalidResponse(format!("not a memory store url: {url:?}"))
        })
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobError> {
        let objects = self.objects.read().await;
        Ok(objects
            .keys()
            .filter(|pathname| pathname.starts_with(prefix))
            .map(|pathname| BlobObject {
                pathname: pathname.clone(),
                url: Self::url_for(pathname),
            })
            .collect())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BlobError> {
        let pathname = Self::pathname_of(url)?;
        let objects = self.objects.read().await;
        match objects.get(pathname) {
            Some(obj) => Ok(obj.bytes.clone()),
            None => Err(BlobError::Backend {
                status: 404,
                message: format!("no object at {pathname:?}"),
            }),
        }
    }

    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobObject, BlobError> {
        let mut objects = self.objects.write().await;
        objects.insert(
            pathname.to_owned(),
            StoredObject {
                content_type: content_type.to_owned(),
                bytes,
            },
        );
        Ok(BlobObject {
            pathname: pathname.to_owned(),
            url: Self::url_for(pathname),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let pathname = Self::pathname_of(url)?;
        self.objects.write().await.remove(pathname);
        Ok(())
    }
}
