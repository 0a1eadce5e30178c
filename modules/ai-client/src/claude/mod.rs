mod client;
pub(crate) mod types;

use tracing::warn;

use crate::error::AiError;
use crate::schema::StructuredOutput;
use client::{ClaudeClient, ANTHROPIC_API_URL};
use types::{ChatRequest, ToolDefinitionWire, WireMessage};

const STRUCTURED_TOOL_NAME: &str = "structured_response";
const DEFAULT_MAX_TOKENS: u32 = 4096;

// =============================================================================
// Claude
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    http: reqwest::Client,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> ClaudeClient<'_> {
        ClaudeClient {
            api_key: &self.api_key,
            base_url: &self.base_url,
            http: &self.http,
        }
    }

    /// Ask for a `T` by forcing a single tool call whose input schema is `T`'s.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T, AiError> {
        let request = ChatRequest::new(&self.model, self.max_tokens)
            .system(system_prompt)
            .message(WireMessage::user(user_prompt))
            .temperature(0.0)
            .forced_tool(ToolDefinitionWire {
                name: STRUCTURED_TOOL_NAME.to_string(),
                description: "Return the requested data in structured form.".to_string(),
                input_schema: T::tool_schema(),
            });

        let response = self.client().chat(&request).await?;

        match response.tool_input(STRUCTURED_TOOL_NAME) {
            Some(input) => Ok(serde_json::from_value(input.clone())?),
            None => {
                warn!(model = %self.model, "Claude replied without calling the structured tool");
                Err(AiError::MissingOutput)
            }
        }
    }

    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String, AiError> {
        let request = ChatRequest::new(&self.model, self.max_tokens)
            .system(system)
            .message(WireMessage::user(user))
            .temperature(0.0);

        self.client()
            .chat(&request)
            .await?
            .text()
            .ok_or(AiError::MissingOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_anthropic_defaults() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514");
        assert_eq!(ai.model(), "claude-sonnet-4-20250514");
        assert_eq!(ai.base_url, ANTHROPIC_API_URL);
        assert_eq!(ai.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn builders_override_defaults() {
        let ai = Claude::new("sk-ant-test", "m")
            .with_base_url("https://proxy.internal/v1")
            .with_max_tokens(1024);
        assert_eq!(ai.base_url, "https://proxy.internal/v1");
        assert_eq!(ai.max_tokens, 1024);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let ai = Claude::new("sk-ant-test", "m").with_base_url("http://127.0.0.1:9");
        let err = ai.chat_completion("system", "hello").await.unwrap_err();
        assert!(matches!(err, AiError::Network(_)), "got {err:?}");
    }
}
