// src/errors.rs
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Image not accessible: {0}")]
    UpstreamUnreachable(String),

    #[error("Failed to start external process: {0}")]
    ProcessStart(String),

    #[error("External process failed: {0}")]
    ProcessFailed(String),

    #[error("Failed to parse external process output: {0}")]
    ProcessOutput(String),

    #[error("External process timed out after {0:?}")]
    ProcessTimeout(Duration),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClipError {
    /// True for failures raised while scoring an item, as opposed to
    /// failures of the request itself.
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(
            self,
            ClipError::UpstreamUnreachable(_)
                | ClipError::ProcessStart(_)
                | ClipError::ProcessFailed(_)
                | ClipError::ProcessOutput(_)
                | ClipError::ProcessTimeout(_)
                | ClipError::Request(_)
        )
    }
}

impl ResponseError for ClipError {
    fn status_code(&self) -> StatusCode {
        match self {
            ClipError::Validation(_) => StatusCode::BAD_REQUEST,
            ClipError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = if self.is_evaluation_failure() {
            json!({
                "success": false,
                "error": "Failed to evaluate image-text similarity",
                "message": self.to_string(),
            })
        } else {
            json!({
                "success": false,
                "error": self.to_string(),
            })
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type Result<T> = std::result::Result<T, ClipError>;
