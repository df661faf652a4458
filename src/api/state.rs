// src/api/state.rs
use crate::config::AppConfig;
use crate::scoring::{HeuristicScorer, HttpProbe, ProcessScorer, ScoringStrategy};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Backs `/api/clip-evaluate`.
    pub heuristic: Arc<dyn ScoringStrategy>,
    /// Backs `/api/evaluate/text-image` and `/api/batch-evaluate`.
    pub delegated: Arc<dyn ScoringStrategy>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.probe_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let heuristic = HeuristicScorer::new(config.model.clone(), Arc::new(HttpProbe::new(client)));
        let delegated = ProcessScorer::new(config.process.clone(), config.model.clone());

        Ok(Self::with_strategies(config, Arc::new(heuristic), Arc::new(delegated)))
    }

    pub fn with_strategies(
        config: AppConfig,
        heuristic: Arc<dyn ScoringStrategy>,
        delegated: Arc<dyn ScoringStrategy>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            heuristic,
            delegated,
        }
    }
}
