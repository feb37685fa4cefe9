use std::env;

/// Blob backend configuration.
///
/// Reads from `TABI_BLOB_BASE_URL`, `BLOB_READ_WRITE_TOKEN`, and
/// `TABI_BLOB_PREFIX`, falling back to the hosted-store defaults when unset.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Base URL of the blob REST API.
    pub base_url: String,
    /// Bearer token for the store. `None` means unauthenticated (only the
    /// in-memory store works without one).
    pub token: Option<String>,
    /// Namespace prefix under which all plan objects live.
    pub prefix: String,
}

impl BlobConfig {
    /// The hosted store's API endpoint, used when no base URL is configured.
    pub const DEFAULT_BASE_URL: &str = "https://blob.vercel-storage.com";

    /// Default namespace prefix for saved plans.
    pub const DEFAULT_PREFIX: &str = "plans/";

    /// Build a config from the environment.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("TABI_BLOB_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_owned()),
            token: env::var("BLOB_READ_WRITE_TOKEN").ok(),
            prefix: env::var("TABI_BLOB_PREFIX")
                .unwrap_or_else(|_| Self::DEFAULT_PREFIX.to_owned()),
        }
    }

    /// Build a config from explicit values (useful for tests and CLI flags).
    pub fn new(base_url: impl Into<String>, token: Option<String>, prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            prefix: prefix.into(),
        }
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            token: None,
            prefix: Self::DEFAULT_PREFIX.to_owned(),
        }
    }
}
