use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::ModelCatalogEntry;
use crate::error::RelayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat` as sent by the client. Every field is optional on
/// the wire so that a missing field becomes a JSON 400 instead of a
/// deserializer rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatPayload {
    pub model: Option<String>,
    pub messages: Option<Vec<Message>>,
    #[serde(rename = "userAddress")]
    pub user_address: Option<String>,
}

/// A chat request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub caller_address: String,
}

impl ChatRequest {
    /// The message being answered. Validation guarantees it exists.
    pub fn query(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    /// Everything before the message being answered.
    pub fn prior(&self) -> &[Message] {
        match self.messages.split_last() {
            Some((_, prior)) => prior,
            None => &[],
        }
    }
}

impl TryFrom<ChatPayload> for ChatRequest {
    type Error = RelayError;

    fn try_from(payload: ChatPayload) -> Result<Self, Self::Error> {
        let model = payload.model.filter(|m| !m.is_empty());
        let messages = payload.messages.filter(|m| !m.is_empty());
        let caller_address = payload.user_address.filter(|a| !a.is_empty());

        let (Some(model), Some(messages), Some(caller_address)) = (model, messages, caller_address)
        else {
            return Err(RelayError::missing_fields());
        };

        if messages.last().map(|m| m.role) != Some(Role::User) {
            return Err(RelayError::Validation(
                "Last message must come from the user".to_string(),
            ));
        }

        Ok(Self {
            model,
            messages,
            caller_address,
        })
    }
}

/// Successful reply to `POST /api/chat`. `response` always holds a
/// `choices[0].message` in the OpenAI shape; any other provider fields are
/// passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: Value,
    #[serde(rename = "tokensUsed")]
    pub tokens_used: u64,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: &'static [ModelCatalogEntry],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
