//! Action dispatch: the request envelope and its handlers.
//!
//! The envelope is decoded straight into a closed sum type, so "unrecognized
//! action" can only occur at the deserialization boundary; past that point
//! every action is a compile-time-checked match arm.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

use tabi_core::model::{SavedPlan, TripRequest};
use tabi_core::{EngineError, StoreError};

use crate::serve::{AppError, AppState};

/// The `{ action, payload }` request envelope.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "camelCase")]
pub enum ActionRequest {
    GetPlans,
    SavePlan(SavedPlan),
    #[serde(rename_all = "camelCase")]
    DeletePlan { plan_id: i64 },
    GeneratePlan(TripRequest),
    SearchInfo { query: String },
}

/// Single dispatch handler behind `POST /api/travel`.
pub async fn handle_action(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<axum::response::Response, AppError> {
    // Decode by hand so a bad envelope yields the same `{ error }` body as
    // every other failure.
    let request: ActionRequest = serde_json::from_value(body)
        .map_err(|e| AppError::bad_request(format!("invalid action request: {e}")))?;

    match request {
        ActionRequest::GetPlans => {
            let plans = state.store.list_plans().await.map_err(store_error)?;
            Ok(Json(plans).into_response())
        }
        ActionRequest::SavePlan(plan) => {
            let plans = state.store.save_plan(&plan).await.map_err(store_error)?;
            Ok(Json(plans).into_response())
        }
        ActionRequest::DeletePlan { plan_id } => {
            let plans = state
                .store
                .delete_plan(plan_id)
                .await
                .map_err(store_error)?;
            Ok(Json(plans).into_response())
        }
        ActionRequest::GeneratePlan(trip) => {
            let engine = require_engine(&state)?;
            let plan = engine.generate_plan(&trip).await.map_err(engine_error)?;
            Ok(Json(plan).into_response())
        }
        ActionRequest::SearchInfo { query } => {
            let engine = require_engine(&state)?;
            let answer = engine.search_info(&query).await.map_err(engine_error)?;
            Ok(Json(serde_json::json!({ "result": answer })).into_response())
        }
    }
}

/// AI-dependent actions short-circuit before any provider call when no
/// credential was configured at startup.
fn require_engine(state: &AppState) -> Result<&tabi_core::PromptEngine, AppError> {
    state.engine.as_ref().ok_or_else(|| {
        error!("generation requested but GEMINI_API_KEY is not configured");
        AppError::server_configuration()
    })
}

fn store_error(err: StoreError) -> AppError {
    warn!(error = %err, "plan store operation failed");
    AppError::internal(err.to_string())
}

fn engine_error(err: EngineError) -> AppError {
    match err {
        EngineError::InvalidDateRange { .. } => AppError::bad_request(err.to_string()),
        // The raw model reply was already logged by the engine; the caller
        // only gets a retry suggestion.
        EngineError::Malformed(_) => {
            warn!(error = %err, "generated itinerary was unusable");
            AppError::internal("the generated itinerary could not be read, please try again")
        }
        EngineError::Provider(provider_err) => {
            warn!(error = %provider_err, "generation provider call failed");
            AppError::internal(provider_err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
