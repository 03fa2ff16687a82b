use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .route("/chat", web::post().to(handlers::chat))
            .route("/models", web::get().to(handlers::models))
            .route("/health", web::get().to(handlers::health_check)),
    );
}

/// The browser client is served from another origin.
pub fn cors() -> Cors {
    Cors::permissive()
}

// Malformed bodies get the same JSON error shape as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = json!({
            "success": false,
            "error": format!("Invalid request body: {}", err),
        });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}
