use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{endpoint, send_json, Provider};
use crate::config::ProviderConfig;
use crate::error::RelayError;
use crate::web::models::ChatRequest;

const NAME: &str = "openai";
const CHAT_PATH: &str = "/v1/chat/completions";

/// OpenAI chat completions, serving every `gpt*` model.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u64,
}

impl OpenAiProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            url: endpoint(&config.endpoint, CHAT_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn handles(&self, model: &str) -> bool {
        model.starts_with("gpt")
    }

    fn translate_request(&self, request: &ChatRequest) -> Value {
        json!({
            "model": request.model,
            "messages": request.messages,
        })
    }

    async fn call(&self, body: Value) -> Result<Value, RelayError> {
        let request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body);
        send_json(NAME, request).await
    }

    fn normalize_response(&self, raw: Value) -> Result<Value, RelayError> {
        // Already in the client's shape; only check that it is there.
        if raw["choices"][0]["message"]["content"].is_string() {
            Ok(raw)
        } else {
            Err(RelayError::upstream_with_details(
                NAME,
                "response has no choices[0].message",
                raw,
            ))
        }
    }

    fn extract_token_usage(&self, raw: &Value) -> Result<u64, RelayError> {
        Usage::deserialize(&raw["usage"])
            .map(|usage| usage.total_tokens)
            .map_err(|err| {
                RelayError::upstream_with_details(NAME, format!("missing usage: {err}"), raw.clone())
            })
    }
}
