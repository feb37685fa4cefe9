//! Gemini provider adapter.
//!
//! POSTs to the Generative Language API's `generateContent` endpoint and
//! extracts text and function-call parts from the first candidate. The
//! response is navigated defensively as untyped JSON -- the API adds fields
//! freely and a strict schema would break on every addition.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::trait_def::{
    GenerationRequest, GenerationResponse, ProviderError, TextGenerator,
};

/// Provider adapter for the Google Generative Language API.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // api_key intentionally omitted.
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire types (request side)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionCallingConfig {
    mode: &'static str,
    allowed_function_names: Vec<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl GeminiClient {
    /// Model used when none is configured.
    pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

    const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Create an adapter for the hosted API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, Self::DEFAULT_BASE_URL)
    }

    /// Create an adapter pointed at a custom endpoint.
    ///
    /// Useful for tests or an API-compatible proxy.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        let (tools, tool_config) = match &request.structured {
            Some(directive) => (
                Some(vec![Tool {
                    function_declarations: vec![FunctionDeclaration {
                        name: directive.name.clone(),
                        parameters: directive.schema.clone(),
                    }],
                }]),
                Some(ToolConfig {
                    function_calling_config: FunctionCallingConfig {
                        mode: "ANY",
                        allowed_function_names: vec![directive.name.clone()],
                    },
                }),
            ),
            None => (None, None),
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            tools,
            tool_config,
        }
    }
}

// ---------------------------------------------------------------------------
// Response parsing helpers
// ---------------------------------------------------------------------------

/// Pull text and function-call parts out of a `generateContent` response.
///
/// Text parts are concatenated in order; the first function call wins. A
/// response with candidates but no usable part is [`ProviderError::Empty`].
fn parse_generate_response(v: &Value) -> Result<GenerationResponse, ProviderError> {
    let parts = v
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    let Some(parts) = parts else {
        return Err(ProviderError::Empty);
    };

    let mut text = String::new();
    let mut structured = None;

    for part in parts {
        if let Some(t) = part.get("text").and_then(|t| t.as_str()) {
            text.push_str(t);
        }
        if structured.is_none() {
            if let Some(call) = part.get("functionCall") {
                structured = call.get("args").cloned();
            }
        }
    }

    if text.is_empty() && structured.is_none() {
        return Err(ProviderError::Empty);
    }

    Ok(GenerationResponse {
        text: (!text.is_empty()).then_some(text),
        structured,
    })
}

/// Extract the provider's own diagnostic from an error body, falling back
/// to the raw text when the body is not the expected `{"error":{...}}`.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let body = Self::build_body(request);
        debug!(
            model = %self.model,
            structured = request.structured.is_some(),
            prompt_chars = request.prompt.len(),
            "calling generateContent"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let value: Value = resp.json().await?;
        parse_generate_response(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("key", "gemini-1.5-flash");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let client = GeminiClient::new("super-secret", GeminiClient::DEFAULT_MODEL);
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn freeform_body_has_no_tools() {
        let body = GeminiClient::build_body(&GenerationRequest::freeform("plan a trip"));
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "plan a trip");
        assert!(v.get("tools").is_none());
        assert!(v.get("toolConfig").is_none());
    }

    #[test]
    fn structured_body_declares_the_function() {
        let body = GeminiClient::build_body(&GenerationRequest::structured(
            "plan a trip",
            "return_travel_plan",
            json!({"type": "object"}),
        ));
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(
            v["tools"][0]["functionDeclarations"][0]["name"],
            "return_travel_plan"
        );
        assert_eq!(v["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
        assert_eq!(
            v["toolConfig"]["functionCallingConfig"]["allowedFunctionNames"][0],
            "return_travel_plan"
        );
    }

    #[test]
    fn parse_collects_text_parts_in_order() {
        let resp = parse_generate_response(&json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}
            }]
        }))
        .unwrap();
        assert_eq!(resp.text(), Some("{\"a\":1}"));
        assert!(resp.structured.is_none());
    }

    #[test]
    fn parse_extracts_function_call_args() {
        let resp = parse_generate_response(&json!({
            "candidates": [{
                "content": {"parts": [
                    {"functionCall": {"name": "return_travel_plan", "args": {"tripTitle": "t"}}}
                ]}
            }]
        }))
        .unwrap();
        assert!(resp.text.is_none());
        assert_eq!(resp.structured.unwrap()["tripTitle"], "t");
    }

    #[test]
    fn parse_keeps_first_function_call_only() {
        let resp = parse_generate_response(&json!({
            "candidates": [{
                "content": {"parts": [
                    {"functionCall": {"name": "a", "args": {"n": 1}}},
                    {"functionCall": {"name": "b", "args": {"n": 2}}}
                ]}
            }]
        }))
        .unwrap();
        assert_eq!(resp.structured.unwrap()["n"], 1);
    }

    #[test]
    fn parse_rejects_missing_candidates() {
        let err = parse_generate_response(&json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, ProviderError::Empty));

        let err = parse_generate_response(&json!({})).unwrap_err();
        assert!(matches!(err, ProviderError::Empty));
    }

    #[test]
    fn parse_rejects_empty_parts() {
        let err = parse_generate_response(&json!({
            "candidates": [{"content": {"parts": []}}]
        }))
        .unwrap_err();
        assert!(matches!(err, ProviderError::Empty));
    }

    #[test]
    fn error_message_comes_from_error_body() {
        let msg = extract_error_message(
            r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#,
        );
        assert_eq!(msg, "Resource has been exhausted");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(extract_error_message("  gateway timeout "), "gateway timeout");
    }
}
