// src/api/handlers/fallback.rs
use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;
use crate::errors::ClipError;
use super::health::endpoint_listing;

/// CORS preflight: empty 200, headers come from the CORS middleware.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    log::debug!("No route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(json!({
        "error": "Endpoint not found",
        "available_endpoints": endpoint_listing()
    }))
}

pub async fn method_not_allowed() -> Result<HttpResponse, ClipError> {
    Err(ClipError::MethodNotAllowed)
}
