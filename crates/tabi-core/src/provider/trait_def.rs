//! The `TextGenerator` trait -- the adapter interface for generation
//! providers.
//!
//! Each concrete provider (Gemini today, stubs in tests) implements this
//! trait. The trait is intentionally object-safe so the engine can hold it
//! as `Arc<dyn TextGenerator>` -- the client is constructed once at process
//! startup and injected, never reached through module state.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status (quota, bad key,
    /// model error). `message` is the provider's own diagnostic when one
    /// could be extracted.
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider answered 2xx but produced no usable output.
    #[error("provider returned an empty response")]
    Empty,
}

/// A structured-output directive: ask the provider to answer through a
/// named call whose arguments conform to `schema`, instead of free text.
#[derive(Debug, Clone)]
pub struct StructuredDirective {
    /// Name of the call the provider should make (e.g. `return_travel_plan`).
    pub name: String,
    /// JSON schema the call arguments must match.
    pub schema: serde_json::Value,
}

/// One generation request: an instruction, optionally schema-constrained.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub structured: Option<StructuredDirective>,
}

impl GenerationRequest {
    /// A plain free-text instruction.
    pub fn freeform(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            structured: None,
        }
    }

    /// An instruction plus a structured output-schema directive.
    pub fn structured(
        prompt: impl Into<String>,
        name: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            structured: Some(StructuredDirective {
                name: name.into(),
                schema,
            }),
        }
    }
}

/// Raw provider output.
///
/// Free-text providers fill `text`; schema-constrained calls fill
/// `structured` with the call's argument payload. Some providers degrade to
/// text even when a structured call was requested, so both can be present
/// or absent independently -- callers decide the fallback order.
#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub structured: Option<serde_json::Value>,
}

impl GenerationResponse {
    /// The concatenated free-text output, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Adapter interface for text-generation providers.
///
/// # Object Safety
///
/// This trait is object-safe: it is held as `Arc<dyn TextGenerator>` by the
/// engine and swapped for a scripted stub in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name for this provider (e.g. "gemini").
    fn name(&self) -> &str;

    /// Submit one instruction and return the provider's raw output.
    ///
    /// No retries happen at this layer; a failure is surfaced to the caller
    /// who is expected to resubmit.
    async fn generate(&self, request: &GenerationRequest)
    -> Result<GenerationResponse, ProviderError>;
}

// Compile-time assertion: TextGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// A trivial provider that echoes its prompt, used only to prove the
    /// trait can be implemented and used as `dyn TextGenerator`.
    struct EchoProvider;

    #[async_trait]
    impl TextGenerator for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, ProviderError> {
            Ok(GenerationResponse {
                text: Some(request.prompt.clone()),
                structured: None,
            })
        }
    }

    #[test]
    fn text_generator_is_object_safe() {
        let provider: Box<dyn TextGenerator> = Box::new(EchoProvider);
        assert_eq!(provider.name(), "echo");
    }

    #[tokio::test]
    async fn echo_provider_roundtrip() {
        let provider: Box<dyn TextGenerator> = Box::new(EchoProvider);
        let resp = provider
            .generate(&GenerationRequest::freeform("hello"))
            .await
            .unwrap();
        assert_eq!(resp.text(), Some("hello"));
        assert!(resp.structured.is_none());
    }

    #[test]
    fn structured_request_carries_directive() {
        let req = GenerationRequest::structured(
            "plan it",
            "return_travel_plan",
            serde_json::json!({"type": "object"}),
        );
        let directive = req.structured.expect("directive should be set");
        assert_eq!(directive.name, "return_travel_plan");
        assert_eq!(directive.schema["type"], "object");
    }
}
