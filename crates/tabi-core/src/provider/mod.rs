//! Generation-provider adapter interface.
//!
//! This module defines the [`TextGenerator`] trait that provider adapters
//! implement, the request/response types, and the [`GeminiClient`] adapter
//! for the Google Generative Language API.
//!
//! # Architecture
//!
//! ```text
//! PromptEngine
//!     |
//!     v
//! Arc<dyn TextGenerator> --generate(request)--> GenerationResponse
//!     |                                             |
//!     |                      text (possibly fenced JSON)
//!     |                      and/or structured call payload
//! ```
//!
//! The engine owns prompt wording and response validation; adapters own the
//! wire format of one provider and nothing else.

pub mod gemini;
pub mod trait_def;

pub use gemini::GeminiClient;
pub use trait_def::{
    GenerationRequest, GenerationResponse, ProviderError, StructuredDirective, TextGenerator,
};
