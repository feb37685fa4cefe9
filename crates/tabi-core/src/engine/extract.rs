//! Extract a typed plan from possibly-fenced model output.
//!
//! Provider text is untrusted: despite the prompt's "no markdown fence"
//! instruction, models regularly wrap the JSON in ```` ```json ```` blocks.
//! Fence-stripping lives here as a pure function so parsing robustness is
//! testable without a live provider. No repair heuristics beyond the fence
//! strip are applied -- an unparseable reply is an error, not a retry.

use thiserror::Error;

use crate::model::TravelPlan;

/// Errors from interpreting model output as a travel plan.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The reply contained no content after fence-stripping.
    #[error("model reply was empty")]
    Empty,

    /// The reply was not a valid plan document.
    #[error("model reply is not a valid travel plan document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Remove a wrapping markdown code fence, if present.
///
/// Handles an opening ```` ``` ```` with an optional language tag (e.g.
/// ```` ```json ````) and a closing ```` ``` ````. Text without a fence is
/// returned unchanged (modulo surrounding whitespace).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag: everything up to the first newline.
    let body = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => return trimmed, // opening fence but no content line
    };

    match body.rsplit_once("```") {
        Some((inner, _)) => inner.trim(),
        None => body.trim(), // unterminated fence: take what is there
    }
}

/// Parse model output into a [`TravelPlan`], stripping a fence first.
pub fn parse_travel_plan(text: &str) -> Result<TravelPlan, ExtractError> {
    let payload = strip_code_fence(text);
    if payload.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(serde_json::from_str(payload)?)
}
