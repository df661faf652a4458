// src/api/routes.rs
use actix_web::{HttpRequest, error::JsonPayloadError, guard, http::header, middleware::DefaultHeaders, web};
use super::handlers;
use crate::errors::ClipError;

/// Largest JSON body accepted, batches included.
const MAX_BODY_BYTES: usize = 1 << 20;

/// Every route the service answers, with a short description.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET /api/clip-evaluate", "Health check"),
    ("POST /api/clip-evaluate", "Single image-text similarity evaluation"),
    (
        "POST /api/clip-evaluate (with items array)",
        "Batch image-text similarity evaluation",
    ),
    ("GET /api/health", "Health check"),
    ("GET /api/info", "API information"),
    ("POST /api/evaluate/text-image", "Text-image similarity evaluation"),
    ("POST /api/batch-evaluate", "Batch evaluation"),
];

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Preflight for any path; must stay ahead of the other resources.
        .service(
            web::resource("/{tail:.*}")
                .guard(guard::Options())
                .to(handlers::preflight),
        )
        .service(
            web::resource("/api/clip-evaluate")
                .route(web::get().to(handlers::clip_health))
                .route(web::post().to(handlers::clip_evaluate))
                .default_service(web::to(handlers::not_found)),
        )
        .service(web::resource(["/api/health", "/health"]).to(handlers::health_check))
        .service(web::resource(["/api/info", "/info"]).to(handlers::api_info))
        .service(
            web::resource(["/api/evaluate/text-image", "/evaluate/text-image"])
                .route(web::post().to(handlers::evaluate_text_image))
                .default_service(web::to(handlers::method_not_allowed)),
        )
        .service(
            web::resource(["/api/batch-evaluate", "/batch-evaluate"])
                .route(web::post().to(handlers::batch_evaluate))
                .default_service(web::to(handlers::method_not_allowed)),
        )
        .service(web::resource("/{tail:.*}").to(handlers::not_found));
}

/// CORS headers attached to every response, preflight or not.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"))
        .add((header::ACCESS_CONTROL_MAX_AGE, "86400"))
}

/// JSON bodies are accepted with any content type; parse failures become
/// a 400 with a JSON error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .content_type_required(false)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            ClipError::Validation(format!("Invalid JSON body: {}", err)).into()
        })
}
