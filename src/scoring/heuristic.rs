// src/scoring/heuristic.rs

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rand::{Rng, thread_rng};
use reqwest::Client;

use crate::errors::{ClipError, Result};
use crate::scoring::{Score, ScoringStrategy};

const BASE_SCORE: f64 = 0.5;
const KEYWORD_BONUS: f64 = 0.15;
const JITTER: f64 = 0.15;
const MIN_SCORE: f64 = 0.1;
const MAX_SCORE: f64 = 0.95;

/// Reachability check for a remote image.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn probe(&self, image_url: &str) -> Result<()>;
}

/// Issues a HEAD request and accepts any 2xx status.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpProbe {
    async fn probe(&self, image_url: &str) -> Result<()> {
        let resp = self
            .client
            .head(image_url)
            .send()
            .await
            .map_err(|e| ClipError::UpstreamUnreachable(e.to_string()))?;

        let status = resp.status();
        debug!("Probe {} -> {}", image_url, status);

        if !status.is_success() {
            return Err(ClipError::UpstreamUnreachable(status.to_string()));
        }
        Ok(())
    }
}

/// Placeholder scorer: keyword overlap between the text and the image URL,
/// plus random jitter. Not a similarity measure in any statistical sense.
pub struct HeuristicScorer {
    model: String,
    probe: Arc<dyn ImageProbe>,
}

impl HeuristicScorer {
    pub fn new(model: impl Into<String>, probe: Arc<dyn ImageProbe>) -> Self {
        Self {
            model: model.into(),
            probe,
        }
    }
}

#[async_trait]
impl ScoringStrategy for HeuristicScorer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn score(&self, image_url: &str, text: &str) -> Result<Score> {
        self.probe.probe(image_url).await?;

        let jitter = thread_rng().gen_range(-JITTER..JITTER);
        Ok(Score {
            similarity_score: heuristic_score(image_url, text, jitter),
            model: self.model.clone(),
        })
    }
}

/// Score arithmetic with the jitter supplied by the caller.
/// Result is clamped to `[0.1, 0.95]` and rounded to 4 decimal places.
pub fn heuristic_score(image_url: &str, text: &str, jitter: f64) -> f64 {
    let url = image_url.to_lowercase();
    let hits = text
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 2 && url.contains(*word))
        .count();

    let raw = BASE_SCORE + KEYWORD_BONUS * hits as f64 + jitter;
    round4(raw.clamp(MIN_SCORE, MAX_SCORE))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProbe(bool);

    #[async_trait]
    impl ImageProbe for StaticProbe {
        async fn probe(&self, _image_url: &str) -> Result<()> {
            if self.0 {
                Ok(())
            } else {
                Err(ClipError::UpstreamUnreachable("404 Not Found".to_string()))
            }
        }
    }

    fn has_at_most_four_decimals(value: f64) -> bool {
        ((value * 10_000.0).round() - value * 10_000.0).abs() < 1e-6
    }

    #[test]
    fn test_base_score_without_keywords() {
        assert_eq!(heuristic_score("https://example.com/img.png", "a dog", 0.0), 0.5);
    }

    #[test]
    fn test_keyword_hits_add_bonus() {
        let score = heuristic_score("https://example.com/cute-cat.png", "a cute cat", 0.0);
        assert_eq!(score, 0.8);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let score = heuristic_score("https://example.com/CAT.png", "Cat", 0.0);
        assert_eq!(score, 0.65);
    }

    #[test]
    fn test_short_tokens_are_ignored() {
        // "a" and "ex" are substrings of the url but too short to count
        assert_eq!(heuristic_score("https://example.com/x.png", "a ex", 0.0), 0.5);
    }

    #[test]
    fn test_score_is_clamped() {
        let many_hits = heuristic_score(
            "https://example.com/red-cat-sitting-on-blue-sofa.png",
            "red cat sitting blue sofa",
            0.1,
        );
        assert_eq!(many_hits, 0.95);

        assert_eq!(heuristic_score("https://example.com/x.png", "dog", -0.15), 0.35);
        assert_eq!(heuristic_score("https://example.com/x.png", "dog", -1.0), 0.1);
    }

    #[test]
    fn test_score_is_rounded_to_four_places() {
        let score = heuristic_score("https://example.com/x.png", "dog", 0.123456789);
        assert_eq!(score, 0.6235);
    }

    #[tokio::test]
    async fn test_random_scores_stay_in_range() {
        let scorer = HeuristicScorer::new("clip", Arc::new(StaticProbe(true)));
        for _ in 0..200 {
            let score = scorer
                .score("https://example.com/cat.png", "a cute cat")
                .await
                .unwrap();
            assert!((MIN_SCORE..=MAX_SCORE).contains(&score.similarity_score));
            assert!(has_at_most_four_decimals(score.similarity_score));
            assert_eq!(score.model, "clip");
        }
    }

    #[tokio::test]
    async fn test_unreachable_image_fails() {
        let scorer = HeuristicScorer::new("clip", Arc::new(StaticProbe(false)));
        let err = scorer
            .score("https://example.com/missing.png", "a cat")
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::UpstreamUnreachable(_)));
        assert_eq!(err.to_string(), "Image not accessible: 404 Not Found");
    }
}
