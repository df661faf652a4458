// src/runner.rs
use log::{info, warn};
use serde_json::Value;
use std::time::Instant;

use crate::errors::Result;
use crate::models::{BatchSummary, EvaluationRequest, EvaluationResult};
use crate::scoring::{Score, ScoringStrategy};

/// Run a single evaluation, returning the score and elapsed milliseconds.
pub async fn run_eval(
    strategy: &dyn ScoringStrategy,
    request: &EvaluationRequest,
) -> Result<(Score, u64)> {
    let start = Instant::now();
    let score = strategy.score(&request.image_url, &request.text).await?;
    let latency_ms = start.elapsed().as_millis() as u64;

    info!(
        "Scored {} with {}: {} ({}ms)",
        request.image_url, score.model, score.similarity_score, latency_ms
    );

    Ok((score, latency_ms))
}

/// Validates and scores one raw batch item. Never fails: problems are
/// reported in the returned result.
async fn run_item(strategy: &dyn ScoringStrategy, item: &Value) -> EvaluationResult {
    let request = match EvaluationRequest::from_value(item) {
        Ok(request) => request,
        Err(e) => return EvaluationResult::failed(item, &e),
    };

    match run_eval(strategy, &request).await {
        Ok((score, _)) => EvaluationResult {
            success: true,
            similarity_score: Some(score.similarity_score),
            text: Some(request.text),
            image_url: Some(request.image_url),
            model: Some(score.model),
            error: None,
        },
        Err(e) => {
            warn!("Evaluation of {} failed: {}", request.image_url, e);
            EvaluationResult::failed(item, &e)
        }
    }
}

/// Run a batch strictly in order, one item at a time. The results line up
/// with `items` one-to-one.
pub async fn run_batch_evals(
    strategy: &dyn ScoringStrategy,
    items: &[Value],
) -> (Vec<EvaluationResult>, BatchSummary) {
    let batch_start = Instant::now();
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        results.push(run_item(strategy, item).await);
    }

    let successful = results.iter().filter(|r| r.success).count();
    let summary = BatchSummary {
        total: items.len(),
        successful,
        failed: items.len() - successful,
        processing_time: batch_start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch of {} completed in {}ms ({} ok, {} failed)",
        summary.total, summary.processing_time, summary.successful, summary.failed
    );

    (results, summary)
}
