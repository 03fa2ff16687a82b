use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use serde_json::json;
use uuid::Uuid;

use crate::catalog;
use crate::config::Config;
use crate::error::RelayError;
use crate::offline;
use crate::offline::personality::personality_for;
use crate::provider::{self, Provider};
use crate::web::models::{ChatRequest, ChatResponse};

/// Routes chat requests to an upstream provider, or to the offline responder
/// when the process has no provider credentials at all.
pub struct Relay {
    providers: Vec<Arc<dyn Provider>>,
}

impl Relay {
    pub fn from_config(config: &Config) -> Result<Self> {
        let providers = provider::from_config(config)?;
        Ok(Self::with_providers(providers))
    }

    /// A relay over the given providers. An empty list puts every request on
    /// the offline path.
    pub fn with_providers(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    pub fn offline() -> Self {
        Self::with_providers(Vec::new())
    }

    /// True when no provider is configured. Offline mode is global: once any
    /// provider exists, models it does not serve are rejected rather than
    /// answered offline.
    pub fn is_offline(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn relay(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError> {
        let request_id = Uuid::new_v4();
        info!(
            "Chat request {} from {}: model={} messages={}",
            request_id,
            request.caller_address,
            request.model,
            request.messages.len()
        );

        if self.is_offline() {
            return Ok(self.respond_offline(request_id, request));
        }

        let Some(provider) = self.providers.iter().find(|p| p.handles(&request.model)) else {
            info!("Request {}: no provider for model {}", request_id, request.model);
            return Err(RelayError::UnsupportedModel(request.model.clone()));
        };

        info!("Request {}: forwarding to {}", request_id, provider.name());
        match provider.complete(request).await {
            Ok(completion) => {
                info!(
                    "Request {}: {} replied, {} tokens",
                    request_id,
                    provider.name(),
                    completion.tokens_used
                );
                Ok(ChatResponse {
                    success: true,
                    response: completion.response,
                    tokens_used: completion.tokens_used,
                    model: request.model.clone(),
                })
            }
            Err(err) => {
                if let RelayError::Upstream { details, .. } = &err {
                    error!("Request {}: {} (details: {})", request_id, err, details);
                } else {
                    error!("Request {}: {}", request_id, err);
                }
                Err(err)
            }
        }
    }

    fn respond_offline(&self, request_id: Uuid, request: &ChatRequest) -> ChatResponse {
        let query = request.query();
        let reply = offline::respond(&request.model, query, request.prior());
        let tokens_used = offline::estimate_tokens(query, &reply);

        info!(
            "Request {}: answered offline as {} ({:?}), {} tokens",
            request_id,
            offline_profile(&request.model),
            offline::intent_for(&request.model, query, request.prior()),
            tokens_used
        );
        debug!("Offline reply: {}", reply);

        ChatResponse {
            success: true,
            response: json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": reply,
                    }
                }]
            }),
            tokens_used,
            model: request.model.clone(),
        }
    }
}

/// Catalog name and personality tone used for an offline reply, for logs.
fn offline_profile(model: &str) -> String {
    let personality = personality_for(model);
    match catalog::find(model) {
        Some(entry) => format!("{} [{}]", entry.display_name, personality.elaboration),
        None => format!("unlisted model {} [{}]", model, personality.elaboration),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::Message;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `gpt*` models with a canned reply, or fails every call.
    struct StubProvider {
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn handles(&self, model: &str) -> bool {
            model.starts_with("gpt")
        }

        fn translate_request(&self, request: &ChatRequest) -> Value {
            json!({ "model": request.model })
        }

        async fn call(&self, _body: Value) -> Result<Value, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(RelayError::upstream_with_details(
                    "stub",
                    "upstream returned 503",
                    json!({"error": {"message": "overloaded"}}),
                ))
            } else {
                Ok(json!({"text": "stubbed", "used": 21}))
            }
        }

        fn normalize_response(&self, raw: Value) -> Result<Value, RelayError> {
            let text = raw["text"].as_str().unwrap_or_default();
            Ok(json!({ "choices": provider::assistant_choices(text) }))
        }

        fn extract_token_usage(&self, raw: &Value) -> Result<u64, RelayError> {
            Ok(raw["used"].as_u64().unwrap_or_default())
        }
    }

    fn request(model: &str, messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: model.into(),
            messages,
            caller_address: "0xabc".into(),
        }
    }

    #[tokio::test]
    async fn offline_reply_charges_estimated_tokens() {
        let relay = Relay::offline();
        let response = relay
            .relay(&request("claude-3-haiku", vec![Message::user("hello")]))
            .await
            .unwrap();

        let content = response.response["choices"][0]["message"]["content"]
            .as_str()
            .unwrap();
        assert!(content.contains("Welcome! Ready to help."));
        assert_eq!(response.tokens_used, offline::estimate_tokens("hello", content));
        assert!(response.success);
        assert_eq!(response.model, "claude-3-haiku");
    }

    #[tokio::test]
    async fn offline_mode_answers_unknown_models() {
        let response = Relay::offline()
            .relay(&request("unknown-model", vec![Message::user("hello")]))
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn configured_provider_serves_matching_model() {
        let stub = StubProvider::new(false);
        let relay = Relay::with_providers(vec![stub.clone() as Arc<dyn Provider>]);
        let response = relay
            .relay(&request("gpt-4", vec![Message::user("hello")]))
            .await
            .unwrap();

        assert_eq!(response.tokens_used, 21);
        assert_eq!(response.response["choices"][0]["message"]["content"], "stubbed");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unserved_model_is_rejected_without_calling_upstream() {
        let stub = StubProvider::new(false);
        let relay = Relay::with_providers(vec![stub.clone() as Arc<dyn Provider>]);
        let err = relay
            .relay(&request("gemini-pro", vec![Message::user("hello")]))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::UnsupportedModel(ref m) if m == "gemini-pro"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_not_retried() {
        let stub = StubProvider::new(true);
        let relay = Relay::with_providers(vec![stub.clone() as Arc<dyn Provider>]);
        let err = relay
            .relay(&request("gpt-3.5-turbo", vec![Message::user("hello")]))
            .await
            .unwrap_err();

        match err {
            RelayError::Upstream { details, .. } => {
                assert_eq!(details["error"]["message"], "overloaded")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn offline_profile_names_catalog_entry_and_tone() {
        assert_eq!(
            offline_profile("claude-3-haiku"),
            "Claude 3 Haiku [efficient and to-the-point]"
        );
        assert_eq!(
            offline_profile("unknown-model"),
            "unlisted model unknown-model [detailed and methodical]"
        );
    }

    #[test]
    fn credentials_disable_offline_mode() {
        assert!(Relay::from_config(&Config::default()).unwrap().is_offline());

        let config = Config::from_lookup(|key| {
            (key == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        });
        let relay = Relay::from_config(&config).unwrap();
        assert!(!relay.is_offline());
        assert_eq!(relay.provider_names(), vec!["openai"]);
    }
}
