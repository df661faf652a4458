// src/models.rs
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{ClipError, Result};

/// One image/text pair to score.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub image_url: String,
    pub text: String,
}

impl EvaluationRequest {
    /// Extracts and validates the pair from a JSON object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let image_url = non_empty_str(value, "image_url");
        let text = non_empty_str(value, "text");

        let (Some(image_url), Some(text)) = (image_url, text) else {
            return Err(ClipError::Validation(
                "Missing required fields: image_url and text".to_string(),
            ));
        };

        if Url::parse(image_url).is_err() {
            return Err(ClipError::Validation(format!(
                "image_url must be a well-formed URL, got '{}'",
                image_url
            )));
        }

        Ok(Self {
            image_url: image_url.to_string(),
            text: text.to_string(),
        })
    }
}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// What a POST body asks for.
#[derive(Debug)]
pub enum EvaluationBody {
    Single(Value),
    /// Raw items; each one is validated on its own so a bad item only fails itself.
    Batch(Vec<Value>),
}

impl EvaluationBody {
    /// Looks for a batch array under `items` or `evaluations`. Either name is
    /// accepted; supplying both is rejected rather than guessing.
    pub fn classify(body: Value) -> Result<Self> {
        let items = body.get("items").filter(|v| v.is_array());
        let evaluations = body.get("evaluations").filter(|v| v.is_array());

        let batch = match (items, evaluations) {
            (Some(_), Some(_)) => {
                return Err(ClipError::Validation(
                    "Provide either items or evaluations, not both".to_string(),
                ));
            }
            (Some(list), None) | (None, Some(list)) => list.as_array().cloned(),
            (None, None) => None,
        };

        Ok(match batch {
            Some(items) => EvaluationBody::Batch(items),
            None => EvaluationBody::Single(body),
        })
    }

    /// Batch-only endpoints: the body must carry an array.
    pub fn batch_only(body: Value) -> Result<Vec<Value>> {
        match Self::classify(body)? {
            EvaluationBody::Batch(items) => Ok(items),
            EvaluationBody::Single(_) => Err(ClipError::Validation(
                "evaluations must be an array".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationResult {
    /// A failed item echoes whatever string fields the caller sent.
    pub fn failed(item: &Value, error: &ClipError) -> Self {
        Self {
            success: false,
            similarity_score: None,
            text: item.get("text").and_then(Value::as_str).map(str::to_string),
            image_url: item.get("image_url").and_then(Value::as_str).map(str::to_string),
            model: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub processing_time: u64,
}

#[derive(Serialize)]
pub struct SingleEvaluationResponse {
    pub success: bool,
    pub similarity_score: f64,
    pub text: String,
    pub image_url: String,
    pub model: String,
    pub processing_time: u64,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct BatchEvaluationResponse {
    pub success: bool,
    pub batch_id: String,
    pub results: Vec<EvaluationResult>,
    pub summary: BatchSummary,
    pub total: usize,
    pub model: String,
    pub timestamp: String,
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_requires_both_fields() {
        let err = EvaluationRequest::from_value(&json!({"image_url": "https://example.com/a.png"}))
            .unwrap_err();
        assert!(matches!(err, ClipError::Validation(_)));

        let err = EvaluationRequest::from_value(&json!({"image_url": "", "text": "a cat"})).unwrap_err();
        assert!(matches!(err, ClipError::Validation(_)));

        let err = EvaluationRequest::from_value(&json!({"image_url": 42, "text": "a cat"})).unwrap_err();
        assert!(matches!(err, ClipError::Validation(_)));
    }

    #[test]
    fn test_request_rejects_malformed_url() {
        let err = EvaluationRequest::from_value(&json!({"image_url": "not a url", "text": "a cat"}))
            .unwrap_err();
        assert!(err.to_string().contains("well-formed URL"));
    }

    #[test]
    fn test_request_keeps_values_verbatim() {
        let req = EvaluationRequest::from_value(&json!({
            "image_url": "https://example.com/Cat.PNG",
            "text": "  A Cute cat "
        }))
        .unwrap();
        assert_eq!(req.image_url, "https://example.com/Cat.PNG");
        assert_eq!(req.text, "  A Cute cat ");
    }

    #[test]
    fn test_classify_accepts_either_batch_name() {
        let items = EvaluationBody::classify(json!({"items": [{}, {}]})).unwrap();
        assert!(matches!(items, EvaluationBody::Batch(ref v) if v.len() == 2));

        let evaluations = EvaluationBody::classify(json!({"evaluations": [{}]})).unwrap();
        assert!(matches!(evaluations, EvaluationBody::Batch(ref v) if v.len() == 1));
    }

    #[test]
    fn test_classify_falls_back_to_single() {
        let body = EvaluationBody::classify(json!({"image_url": "x", "text": "y", "items": "nope"})).unwrap();
        assert!(matches!(body, EvaluationBody::Single(_)));
    }

    #[test]
    fn test_classify_rejects_both_batch_names() {
        let err = EvaluationBody::classify(json!({"items": [], "evaluations": []})).unwrap_err();
        assert!(matches!(err, ClipError::Validation(_)));
    }

    #[test]
    fn test_batch_only_requires_array() {
        let err = EvaluationBody::batch_only(json!({"evaluations": {"image_url": "x"}})).unwrap_err();
        assert_eq!(err.to_string(), "evaluations must be an array");
    }

    #[test]
    fn test_failed_result_omits_score() {
        let result = EvaluationResult::failed(
            &json!({"image_url": "https://example.com/a.png"}),
            &ClipError::Validation("Missing required fields: image_url and text".to_string()),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["image_url"], "https://example.com/a.png");
        assert!(value.get("similarity_score").is_none());
        assert!(value.get("text").is_none());
    }
}
