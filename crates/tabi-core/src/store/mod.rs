//! Plan store: CRUD over the blob namespace.
//!
//! Every saved plan is one JSON document at `{prefix}{id}.json`. The blob
//! namespace is the sole source of truth -- nothing is cached, and every
//! operation ends with a fresh list so callers always receive current
//! state. There is no snapshot isolation: a listing that races a write may
//! or may not observe it, and two writers to the same id resolve to
//! whichever write the next list observes.

use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::debug;

use tabi_blob::{BlobError, BlobObject, BlobStore};

use crate::model::SavedPlan;

const CONTENT_TYPE_JSON: &str = "application/json";

/// Errors from the plan store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The blob backend failed.
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// A stored document could not be decoded as a saved plan.
    #[error("stored plan at {pathname:?} is not decodable: {source}")]
    Decode {
        pathname: String,
        source: serde_json::Error,
    },

    /// The plan could not be encoded for storage.
    #[error("plan {id} could not be encoded: {source}")]
    Encode { id: i64, source: serde_json::Error },
}

/// CRUD facade over the saved-plan namespace.
#[derive(Clone)]
pub struct PlanStore {
    blob: Arc<dyn BlobStore>,
    prefix: String,
}

impl PlanStore {
    /// Create a store over `blob`, with all keys under `prefix`.
    pub fn new(blob: Arc<dyn BlobStore>, prefix: impl Into<String>) -> Self {
        Self {
            blob,
            prefix: prefix.into(),
        }
    }

    /// The exact object key for a plan id.
    fn pathname_for(&self, id: i64) -> String {
        format!("{}{}.json", self.prefix, id)
    }

    /// List all saved plans, most recently created first.
    ///
    /// Blob contents are fetched concurrently; completion order never leaks
    /// into the result, which is always sorted by id descending.
    pub async fn list_plans(&self) -> Result<Vec<SavedPlan>, StoreError> {
        let objects = self.blob.list(&self.prefix).await?;
        let mut plans = try_join_all(objects.iter().map(|obj| self.fetch_plan(obj))).await?;
        plans.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(plans)
    }

    async fn fetch_plan(&self, object: &BlobObject) -> Result<SavedPlan, StoreError> {
        let bytes = self.blob.fetch(&object.url).await?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            pathname: object.pathname.clone(),
            source,
        })
    }

    /// Create or overwrite `plan` at its id's key, then return the
    /// refreshed collection.
    ///
    /// Overwrite is silent: there is no version check, and a race between
    /// two savers of the same id resolves to last-write-wins.
    pub async fn save_plan(&self, plan: &SavedPlan) -> Result<Vec<SavedPlan>, StoreError> {
        let bytes = serde_json::to_vec(plan).map_err(|source| StoreError::Encode {
            id: plan.id,
            source,
        })?;
        self.blob
            .put(&self.pathname_for(plan.id), bytes, CONTENT_TYPE_JSON)
            .await?;
        debug!(id = plan.id, "plan saved");
        self.list_plans().await
    }

    /// Delete the plan with `id`, then return the refreshed collection.
    ///
    /// A missing target is a successful no-op, so repeated deletes are safe.
    pub async fn delete_plan(&self, id: i64) -> Result<Vec<SavedPlan>, StoreError> {
        let target = self.pathname_for(id);
        let candidates = self.blob.list(&target).await?;

        // The backend lists by prefix, which would also surface
        // plans/12.json when the target is plans/1.json. Only an exact
        // pathname match may be deleted.
        match candidates.into_iter().find(|obj| obj.pathname == target) {
            Some(object) => {
                self.blob.delete(&object.url).await?;
                debug!(id, "plan deleted");
            }
            None => debug!(id, "delete target already absent"),
        }

        self.list_plans().await
    }
}
