//! Prompt-driven itinerary generation.
//!
//! [`PromptEngine`] turns a [`TripRequest`] into an instruction, submits it
//! through an injected [`TextGenerator`], and validates the reply into a
//! [`TravelPlan`]. Prompt wording lives in [`prompt`]; fence-stripping and
//! parsing live in [`extract`].

pub mod extract;
pub mod prompt;

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use crate::model::{TravelPlan, TripRequest};
use crate::provider::{GenerationRequest, ProviderError, TextGenerator};

pub use extract::ExtractError;

/// Errors from the generation pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request's dates are inverted; nothing was sent to the provider.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// The provider call itself failed (network, quota, model error).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider answered, but not with a parseable plan document.
    #[error(transparent)]
    Malformed(#[from] ExtractError),
}

/// The itinerary generation engine.
///
/// Holds an explicitly constructed provider client, injected at
/// construction time and scoped to process startup.
#[derive(Clone)]
pub struct PromptEngine {
    provider: Arc<dyn TextGenerator>,
    structured_output: bool,
}

impl PromptEngine {
    /// Create an engine over `provider`, in free-text mode.
    pub fn new(provider: Arc<dyn TextGenerator>) -> Self {
        Self {
            provider,
            structured_output: false,
        }
    }

    /// Toggle schema-constrained generation.
    ///
    /// When enabled, the provider is asked to answer through a structured
    /// `return_travel_plan` call; providers that degrade to free text are
    /// still handled by the fence-strip-and-parse path.
    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    /// Generate a complete itinerary for `request`.
    pub async fn generate_plan(&self, request: &TripRequest) -> Result<TravelPlan, EngineError> {
        if request.start_date > request.end_date {
            return Err(EngineError::InvalidDateRange {
                start: request.start_date,
                end: request.end_date,
            });
        }

        let instruction = prompt::build_plan_prompt(request);
        let generation = if self.structured_output {
            GenerationRequest::structured(
                instruction,
                prompt::STRUCTURED_CALL_NAME,
                prompt::travel_plan_schema(),
            )
        } else {
            GenerationRequest::freeform(instruction)
        };

        let response = self.provider.generate(&generation).await?;

        // Prefer the structured payload when the provider made the call.
        if let Some(args) = response.structured {
            let plan: TravelPlan = serde_json::from_value(args).map_err(|e| {
                warn!(provider = self.provider.name(), error = %e,
                    "structured call payload did not match the plan shape");
                ExtractError::Json(e)
            })?;
            check_cardinality(&plan);
            return Ok(plan);
        }

        // Free text, possibly fenced. The raw reply is logged for diagnosis
        // but never surfaced to the caller.
        let text = response.text.as_deref().unwrap_or_default();
        let plan = extract::parse_travel_plan(text).inspect_err(|e| {
            warn!(provider = self.provider.name(), error = %e, raw = text,
                "discarding unparseable model reply");
        })?;
        check_cardinality(&plan);
        Ok(plan)
    }

    /// Answer a free-text travel question. The reply is returned unmodified.
    pub async fn search_info(&self, query: &str) -> Result<String, EngineError> {
        let generation = GenerationRequest::freeform(prompt::build_search_prompt(query));
        let response = self.provider.generate(&generation).await?;
        response
            .text
            .ok_or(EngineError::Provider(ProviderError::Empty))
    }
}

/// The prompt mandates at least 5 hotels and restaurants; a short list is a
/// quality signal worth a log line but not a rejection.
fn check_cardinality(plan: &TravelPlan) {
    if plan.hotel_recommendations.len() < prompt::MIN_RECOMMENDATIONS {
        warn!(
            got = plan.hotel_recommendations.len(),
            "generator returned fewer hotel recommendations than requested"
        );
    }
    if plan.restaurant_recommendations.len() < prompt::MIN_RECOMMENDATIONS {
        warn!(
            got = plan.restaurant_recommendations.len(),
            "generator returned fewer restaurant recommendations than requested"
        );
    }
}
