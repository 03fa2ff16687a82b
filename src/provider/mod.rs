//! Upstream provider integrations.
//!
//! Each provider family translates the shared message list into its own
//! request body, calls its completion endpoint, and maps the reply back into
//! the OpenAI-style `choices[0].message` shape the client reads.

pub mod anthropic;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::Config;
use crate::error::RelayError;
use crate::web::models::ChatRequest;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

/// A normalized provider reply plus the tokens it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub response: Value,
    pub tokens_used: u64,
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Short name used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Whether this provider serves `model`.
    fn handles(&self, model: &str) -> bool;

    /// Provider-specific request body for `request`.
    fn translate_request(&self, request: &ChatRequest) -> Value;

    /// Sends `body` to the provider and returns its raw JSON reply.
    async fn call(&self, body: Value) -> Result<Value, RelayError>;

    /// Ensures `raw` carries `choices[0].message`, keeping other fields.
    fn normalize_response(&self, raw: Value) -> Result<Value, RelayError>;

    /// Total tokens billed for the reply.
    fn extract_token_usage(&self, raw: &Value) -> Result<u64, RelayError>;

    async fn complete(&self, request: &ChatRequest) -> Result<Completion, RelayError> {
        let body = self.translate_request(request);
        debug!("{} request body: {}", self.name(), body);
        let raw = self.call(body).await?;
        let tokens_used = self.extract_token_usage(&raw)?;
        let response = self.normalize_response(raw)?;
        Ok(Completion {
            response,
            tokens_used,
        })
    }
}

/// Builds one provider per family that has an API key in `config`.
pub fn from_config(config: &Config) -> Result<Vec<Arc<dyn Provider>>, reqwest::Error> {
    let client = Client::builder().timeout(config.upstream_timeout).build()?;

    let mut providers: Vec<Arc<dyn Provider>> = Vec::new();
    if let Some(openai) = &config.openai {
        providers.push(Arc::new(OpenAiProvider::new(client.clone(), openai)));
    }
    if let Some(anthropic) = &config.anthropic {
        providers.push(Arc::new(
            AnthropicProvider::new(client.clone(), anthropic)
                .with_version(&config.anthropic_version)
                .with_max_tokens(config.anthropic_max_tokens),
        ));
    }
    Ok(providers)
}

/// Joins a configured base URL with the API path, accepting bases that
/// already end in `/v1` or in the full path.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(path) {
        base.to_string()
    } else if base.ends_with("/v1") {
        format!("{base}{}", path.trim_start_matches("/v1"))
    } else {
        format!("{base}{path}")
    }
}

/// Sends a prepared request and decodes the JSON reply. Non-2xx replies keep
/// their body as error details.
pub(crate) async fn send_json(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<Value, RelayError> {
    let response = request.send().await.map_err(|err| {
        if err.is_timeout() {
            RelayError::upstream(provider, format!("request timed out: {err}"))
        } else {
            RelayError::upstream(provider, err.to_string())
        }
    })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| RelayError::upstream(provider, err.to_string()))?;

    if !status.is_success() {
        let details = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(RelayError::upstream_with_details(
            provider,
            format!("upstream returned {status}"),
            details,
        ));
    }

    serde_json::from_str(&text).map_err(|err| {
        RelayError::upstream(provider, format!("failed to parse {provider} response: {err}"))
    })
}

/// The `choices` array the client expects, holding one assistant message.
pub(crate) fn assistant_choices(content: &str) -> Value {
    serde_json::json!([{
        "message": {
            "role": "assistant",
            "content": content,
        }
    }])
}
