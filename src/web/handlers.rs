use actix_web::{web, HttpResponse, Responder};
use chrono::{SecondsFormat, Utc};
use log::warn;

use crate::catalog;
use crate::error::RelayError;
use crate::web::models::{ChatPayload, ChatRequest, HealthResponse, ModelsResponse};
use crate::web::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

// Static model catalog
pub async fn models() -> impl Responder {
    HttpResponse::Ok().json(ModelsResponse {
        models: catalog::models(),
    })
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    payload: web::Json<ChatPayload>,
) -> Result<HttpResponse, RelayError> {
    let request = ChatRequest::try_from(payload.into_inner()).map_err(|err| {
        warn!("Rejected chat request: {}", err);
        err
    })?;

    let response = data.relay.relay(&request).await?;
    Ok(HttpResponse::Ok().json(response))
}
