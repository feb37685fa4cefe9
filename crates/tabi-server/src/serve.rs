use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use tabi_core::{PlanStore, PromptEngine};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Boundary error: every subsystem failure is mapped to one of these before
/// it leaves the process, so callers only ever see `{ "error": message }`.
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    /// Missing server-side credential. The caller gets a generic message;
    /// the specifics stay in the server log.
    pub fn server_configuration() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "server configuration error".to_string(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State & router
// ---------------------------------------------------------------------------

/// Shared per-process state: the plan store and, when a provider credential
/// was configured at startup, the generation engine.
#[derive(Clone)]
pub struct AppState {
    pub store: PlanStore,
    pub engine: Option<PromptEngine>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/travel", post(crate::dispatch::handle_action))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("tabi serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("tabi serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Index page
// ---------------------------------------------------------------------------

/// Minimal operator page: the saved plans, newest first.
async fn index(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    let plans = state
        .store
        .list_plans()
        .await
        .map_err(|e| AppError::internal(e.to_string()))?;

    let rows = if plans.is_empty() {
        "<tr><td colspan=\"4\">No saved plans.</td></tr>".to_string()
    } else {
        plans
            .iter()
            .map(|p| {
                format!(
                    "<tr><td>{id}</td><td>{title}</td><td>{dest}</td><td>{start} ~ {end}</td></tr>",
                    id = p.id,
                    title = p.plan.trip_title,
                    dest = p.destination,
                    start = p.start_date,
                    end = p.end_date,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let html = format!(
        "<!DOCTYPE html>\
<html><head><title>tabi</title></head><body>\
<h1>tabi</h1>\
<p>POST /api/travel</p>\
<table><tr><th>ID</th><th>Title</th><th>Destination</th><th>Dates</th></tr>{rows}</table>\
</body></html>"
    );

    Ok(Html(html).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use tabi_blob::MemoryBlobStore;
    use tabi_core::PlanStore;
    use tabi_test_utils::sample_saved_plan;

    use super::AppState;

    fn blob_only_state() -> AppState {
        AppState {
            store: PlanStore::new(Arc::new(MemoryBlobStore::new()), "plans/"),
            engine: None,
        }
    }

    async fn send(state: AppState, request: Request<Body>) -> axum::response::Response {
        super::build_router(state).oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_index_returns_html_with_plans() {
        let state = blob_only_state();
        state.store.save_plan(&sample_saved_plan(100)).await.unwrap();

        let resp = send(
            state,
            Request::builder().uri("/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );

        let bytes = axum::body::to_bytes(resp.into_body(), 1_048_576)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("100"));
        assert!(html.contains("도쿄 2박 3일"));
    }

    #[tokio::test]
    async fn test_dispatch_route_rejects_get() {
        let resp = send(
            blob_only_state(),
            Request::builder()
                .uri("/api/travel")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_preflight_is_answered_without_body() {
        let resp = send(
            blob_only_state(),
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/travel")
                .header("origin", "https://app.example")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert!(resp.status().is_success());
        assert!(resp
            .headers()
            .contains_key("access-control-allow-origin"));

        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert!(bytes.is_empty(), "preflight response should carry no body");
    }

    #[tokio::test]
    async fn test_responses_carry_cors_headers() {
        let body = serde_json::json!({"action": "getPlans"});
        let resp = send(
            blob_only_state(),
            Request::builder()
                .method(Method::POST)
                .uri("/api/travel")
                .header("origin", "https://app.example")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
