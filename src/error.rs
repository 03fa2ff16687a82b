use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

/// Every way a chat request can fail. The offline responder never fails, so
/// only validation, routing and upstream calls appear here.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request is missing required fields or is malformed.
    #[error("{0}")]
    Validation(String),
    /// Credentials exist, but none of the configured providers serves this model.
    #[error("API key not configured for this model")]
    UnsupportedModel(String),
    /// The upstream provider failed: transport, timeout, non-2xx status or an
    /// unreadable body. `details` carries the upstream payload when one exists.
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
        details: Value,
    },
}

impl RelayError {
    pub fn missing_fields() -> Self {
        Self::Validation("Missing required fields".to_string())
    }

    pub fn upstream(provider: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Upstream {
            provider,
            details: Value::String(message.clone()),
            message,
        }
    }

    pub fn upstream_with_details(
        provider: &'static str,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
            details,
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnsupportedModel(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Upstream { details, .. } => json!({
                "success": false,
                "error": "Failed to process request",
                "details": details,
            }),
            other => json!({
                "success": false,
                "error": other.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(
            RelayError::missing_fields().status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::UnsupportedModel("gemini-pro".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_error_keeps_message_as_details() {
        let err = RelayError::upstream("openai", "connection refused");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            RelayError::Upstream { details, .. } => {
                assert_eq!(details, Value::String("connection refused".into()))
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
