// src/api/handlers/health.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::{json, Map, Value};
use crate::api::AppState;
use crate::api::routes::ENDPOINTS;
use crate::models::timestamp;

const SERVICE_NAME: &str = "Real CLIP Evaluation API";

pub async fn clip_health(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.config.model,
        "timestamp": timestamp()
    })))
}

pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp()
    })))
}

pub async fn api_info(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "CLIP image-text similarity evaluation",
        "endpoints": endpoint_listing(),
        "model": state.config.model,
        "timestamp": timestamp()
    })))
}

pub(super) fn endpoint_listing() -> Value {
    let map: Map<String, Value> = ENDPOINTS
        .iter()
        .map(|(route, description)| (route.to_string(), Value::from(*description)))
        .collect();
    Value::Object(map)
}
