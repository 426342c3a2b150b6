//! utils.rs

use actix_web::{web, HttpResponse, Responder};
use common_lib::clock::Clock;
use serde_json::json;

use crate::api::ApiError;
use crate::configuration::Settings;

/// say "pong"
/// authorization: none
pub async fn get_ping() -> impl Responder {
    tracing::debug!("[get_ping]");
    HttpResponse::Ok().body("pong")
}

/// GET /health
/// authorization: none
pub async fn get_health(clock: web::Data<dyn Clock>, settings: web::Data<Settings>) -> HttpResponse {
    tracing::debug!("[get_health]");
    HttpResponse::Ok().append_header(("Cache-Control", "no-store")).json(json!({
        "success": true,
        "message": "API is running!",
        "timestamp": clock.now(),
        "environment": &settings.environment,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// CORS preflight; the allow headers come from the default headers middleware
pub async fn preflight() -> HttpResponse {
    tracing::debug!("[preflight]");
    HttpResponse::Ok().finish()
}

/// anything but GET/OPTIONS on a known path
pub async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    tracing::debug!("[method_not_allowed]");
    Err(ApiError::MethodNotAllowed)
}

/// no route for this path
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    tracing::debug!("[not_found]");
    Err(ApiError::NotFound)
}
