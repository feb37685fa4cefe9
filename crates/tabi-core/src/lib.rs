//! Core domain logic for tabi.
//!
//! Three pieces compose here:
//!
//! - [`model`] -- the typed itinerary records (destinations, daily plans,
//!   recommendations, saved plans) shared across the whole system.
//! - [`engine`] -- prompt construction, provider calls, and response
//!   validation, behind an injected [`provider::TextGenerator`].
//! - [`store`] -- the plan CRUD facade over a [`tabi_blob::BlobStore`]
//!   namespace, with list-then-mutate-then-list-again semantics.

pub mod engine;
pub mod model;
pub mod provider;
pub mod store;

pub use engine::{EngineError, PromptEngine};
pub use store::{PlanStore, StoreError};
