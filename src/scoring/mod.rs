// src/scoring/mod.rs

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;

pub mod external;
pub mod heuristic;

pub use external::ProcessScorer;
pub use heuristic::{HeuristicScorer, HttpProbe, ImageProbe};

/// A score produced for one image/text pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub similarity_score: f64,
    pub model: String,
}

/// A common trait for the ways a pair can be scored.
/// Handlers only see this trait, so a real model backend can replace either
/// implementation without touching the router.
#[async_trait]
pub trait ScoringStrategy: Send + Sync {
    /// Model identifier reported when the backend does not name one.
    fn model(&self) -> &str;

    /// Scores how well the image at `image_url` matches `text`.
    async fn score(&self, image_url: &str, text: &str) -> Result<Score>;
}
