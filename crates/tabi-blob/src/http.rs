//! HTTP blob store adapter.
//!
//! Speaks the hosted store's REST shape: `GET ?prefix=` to enumerate,
//! `PUT /{pathname}` to create-or-overwrite, `POST /delete` to remove, and a
//! plain `GET` on the object URL to download. All calls carry the bearer
//! token from [`crate::BlobConfig`].

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BlobConfig;
use crate::trait_def::{BlobError, BlobObject, BlobStore};

/// Blob backend client for a Vercel-Blob-style REST API.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    http: Client,
    base_url: String,
    token: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListResponse {
    blobs: Vec<ListedBlob>,
}

#[derive(Debug, Deserialize)]
struct ListedBlob {
    url: String,
    pathname: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
    pathname: String,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    urls: [&'a str; 1],
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl HttpBlobStore {
    /// Create a store client from a [`BlobConfig`].
    ///
    /// Fails when the config carries no token -- the hosted store rejects
    /// every unauthenticated call, so constructing a client without one is
    /// always a configuration mistake.
    pub fn from_config(config: &BlobConfig) -> Result<Self, BlobError> {
        let token = config.token.clone().ok_or_else(|| {
            BlobError::Unconfigured("no token; set BLOB_READ_WRITE_TOKEN".to_owned())
        })?;
        Ok(Self::new(&config.base_url, token))
    }

    /// Create a store client from explicit values.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            token: token.into(),
        }
    }

    fn object_endpoint(&self, pathname: &str) -> String {
        format!("{}/{}", self.base_url, pathname)
    }

    /// Convert a non-success response into [`BlobError::Backend`], keeping
    /// the body text as the message (the store puts its diagnostics there).
    async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, BlobError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_owned());
        Err(BlobError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

fn trim_trailing_slash(mut s: String) -> String {
    while s.ends_with('/') {
        s.pop();
    }
    s
}

#[async_trait::async_trait]
impl BlobStore for HttpBlobStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobError> {
        debug!(prefix, "listing blobs");
        let resp = self
            .http
            .get(&self.base_url)
            .bearer_auth(&self.token)
            .query(&[("prefix", prefix)])
            .send()
            .await?;
        let resp = Self::ensure_success(resp).await?;

        let parsed: ListResponse = resp
            .json()
            .await
            .map_err(|e| BlobError::InvalidResponse(format!("list body: {e}")))?;

        Ok(parsed
            .blobs
            .into_iter()
            .map(|b| BlobObject {
                pathname: b.pathname,
                url: b.url,
            })
            .collect())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BlobError> {
        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        let resp = Self::ensure_success(resp).await?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobObject, BlobError> {
        debug!(pathname, bytes = bytes.len(), "uploading blob");
        let resp = self
            .http
            .put(self.object_endpoint(pathname))
            .bearer_auth(&self.token)
            .header("x-content-type", content_type)
            // Stable pathnames: the caller's key IS the object identity.
            .header("x-add-random-suffix", "0")
            .body(bytes)
            .send()
            .await?;
        let resp = Self::ensure_success(resp).await?;

        let parsed: PutResponse = resp
            .json()
            .await
            .map_err(|e| BlobError::InvalidResponse(format!("put body: {e}")))?;

        Ok(BlobObject {
            pathname: parsed.pathname,
            url: parsed.url,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        debug!(url, "deleting blob");
        let resp = self
            .http
            .post(format!("{}/delete", self.base_url))
            .bearer_auth(&self.token)
            .json(&DeleteRequest { urls: [url] })
            .send()
            .await?;
        Self::ensure_success(resp).await?;
        Ok(())
    }
}
