use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{assistant_choices, endpoint, send_json, Provider};
use crate::config::{ProviderConfig, DEFAULT_ANTHROPIC_MAX_TOKENS, DEFAULT_ANTHROPIC_VERSION};
use crate::error::RelayError;
use crate::web::models::{ChatRequest, Role};

const NAME: &str = "anthropic";
const MESSAGES_PATH: &str = "/v1/messages";

/// Anthropic Messages API, serving every `claude*` model.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    url: String,
    version: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            url: endpoint(&config.endpoint, MESSAGES_PATH),
            version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
        }
    }

    /// Overrides the `anthropic-version` header.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn handles(&self, model: &str) -> bool {
        model.starts_with("claude")
    }

    fn translate_request(&self, request: &ChatRequest) -> Value {
        // Anthropic takes system prompts as a top-level field, not a role.
        let (system, turns): (Vec<_>, Vec<_>) = request
            .messages
            .iter()
            .partition(|m| m.role == Role::System);

        let messages: Vec<Value> = turns
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        let mut body = json!({
            "model": request.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
        });
        if !system.is_empty() {
            let prompt = system
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            body["system"] = Value::String(prompt);
        }
        body
    }

    async fn call(&self, body: Value) -> Result<Value, RelayError> {
        let request = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.version)
            .json(&body);
        send_json(NAME, request).await
    }

    fn normalize_response(&self, mut raw: Value) -> Result<Value, RelayError> {
        let blocks = Vec::<ContentBlock>::deserialize(&raw["content"]).unwrap_or_default();
        let Some(text) = blocks
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
        else {
            return Err(RelayError::upstream_with_details(
                NAME,
                "response has no text content",
                raw,
            ));
        };

        if !raw.is_object() {
            return Err(RelayError::upstream_with_details(
                NAME,
                "response is not a JSON object",
                raw,
            ));
        }
        raw["choices"] = assistant_choices(&text);
        Ok(raw)
    }

    fn extract_token_usage(&self, raw: &Value) -> Result<u64, RelayError> {
        Usage::deserialize(&raw["usage"])
            .map(|usage| usage.input_tokens + usage.output_tokens)
            .map_err(|err| {
                RelayError::upstream_with_details(NAME, format!("missing usage: {err}"), raw.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::Message;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(
            Client::new(),
            &ProviderConfig {
                api_key: "key".into(),
                endpoint: "https://api.anthropic.com".into(),
            },
        )
    }

    fn sample_reply() -> Value {
        json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-haiku",
            "content": [{"type": "text", "text": "Hello from Claude"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 25}
        })
    }

    #[test]
    fn body_carries_max_tokens_and_system_prompt() {
        let request = ChatRequest {
            model: "claude-3-haiku".into(),
            messages: vec![
                Message {
                    role: Role::System,
                    content: "Be brief.".into(),
                },
                Message::user("hello"),
            ],
            caller_address: "0xabc".into(),
        };
        let body = provider().with_max_tokens(512).translate_request(&request);
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["system"], "Be brief.");
        assert_eq!(body["messages"], json!([{"role": "user", "content": "hello"}]));
    }

    #[test]
    fn default_body_uses_4096_tokens_and_no_system() {
        let request = ChatRequest {
            model: "claude-3-opus".into(),
            messages: vec![Message::user("hello")],
            caller_address: "0xabc".into(),
        };
        let body = provider().translate_request(&request);
        assert_eq!(body["max_tokens"], 4096);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn usage_sums_input_and_output() {
        assert_eq!(provider().extract_token_usage(&sample_reply()).unwrap(), 35);
    }

    #[test]
    fn first_text_block_becomes_choice() {
        let normalized = provider().normalize_response(sample_reply()).unwrap();
        assert_eq!(
            normalized["choices"][0]["message"],
            json!({"role": "assistant", "content": "Hello from Claude"})
        );
        assert_eq!(normalized["id"], "msg_01");
    }

    #[test]
    fn reply_without_text_is_an_upstream_error() {
        let err = provider()
            .normalize_response(json!({"content": [], "usage": {"input_tokens": 1, "output_tokens": 0}}))
            .unwrap_err();
        assert!(matches!(err, RelayError::Upstream { .. }));
    }

    #[test]
    fn routes_claude_models() {
        let p = provider();
        assert!(p.handles("claude-3-sonnet"));
        assert!(!p.handles("gemini-pro"));
        assert_eq!(p.url(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn missing_usage_keeps_reply_as_details() {
        let reply = json!({"content": [{"type": "text", "text": "hi"}]});
        match provider().extract_token_usage(&reply) {
            Err(RelayError::Upstream { details, .. }) => assert_eq!(details, reply),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
