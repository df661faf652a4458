// src/api/handlers/evals.rs
use actix_web::{web, HttpResponse};
use serde_json::Value;
use uuid::Uuid;
use crate::api::AppState;
use crate::errors::ClipError;
use crate::models::{
    timestamp, BatchEvaluationResponse, EvaluationBody, EvaluationRequest, SingleEvaluationResponse,
};
use crate::runner;
use crate::scoring::ScoringStrategy;

/// `POST /api/clip-evaluate`: single or batch, scored by the heuristic.
pub async fn clip_evaluate(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ClipError> {
    match EvaluationBody::classify(body.into_inner())? {
        EvaluationBody::Batch(items) => {
            state.config.require_token()?;
            Ok(batch_response(state.heuristic.as_ref(), &items).await)
        }
        EvaluationBody::Single(value) => {
            let request = EvaluationRequest::from_value(&value)?;
            state.config.require_token()?;
            single_response(state.heuristic.as_ref(), request).await
        }
    }
}

/// `POST /api/evaluate/text-image`: single pair, scored by the external process.
pub async fn evaluate_text_image(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ClipError> {
    let request = EvaluationRequest::from_value(&body)?;
    state.config.require_token()?;
    single_response(state.delegated.as_ref(), request).await
}

/// `POST /api/batch-evaluate`: batch, scored by the external process.
pub async fn batch_evaluate(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ClipError> {
    let items = EvaluationBody::batch_only(body.into_inner())?;
    state.config.require_token()?;
    Ok(batch_response(state.delegated.as_ref(), &items).await)
}

async fn single_response(
    strategy: &dyn ScoringStrategy,
    request: EvaluationRequest,
) -> Result<HttpResponse, ClipError> {
    let (score, processing_time) = runner::run_eval(strategy, &request).await.map_err(|e| {
        log::error!("CLIP evaluation error for {}: {}", request.image_url, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(SingleEvaluationResponse {
        success: true,
        similarity_score: score.similarity_score,
        text: request.text,
        image_url: request.image_url,
        model: score.model,
        processing_time,
        timestamp: timestamp(),
    }))
}

async fn batch_response(strategy: &dyn ScoringStrategy, items: &[Value]) -> HttpResponse {
    let (results, summary) = runner::run_batch_evals(strategy, items).await;

    HttpResponse::Ok().json(BatchEvaluationResponse {
        success: true,
        batch_id: Uuid::new_v4().to_string(),
        total: summary.total,
        results,
        summary,
        model: strategy.model().to_string(),
        timestamp: timestamp(),
    })
}
