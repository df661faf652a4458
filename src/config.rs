// src/config.rs
use std::time::Duration;

use crate::errors::{ClipError, Result};

pub const DEFAULT_MODEL: &str = "openai/clip-vit-base-patch32";
const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 120;

/// How the external scorer is launched.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub program: String,
    pub args: Vec<String>,
    /// `None` waits for the process indefinitely.
    pub timeout: Option<Duration>,
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    /// Secret gating the evaluation endpoints. Health and info stay
    /// reachable without it.
    pub huggingface_token: Option<String>,
    pub probe_timeout: Option<Duration>,
    pub process: ProcessConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            model: DEFAULT_MODEL.to_string(),
            huggingface_token: None,
            probe_timeout: None,
            process: ProcessConfig {
                program: "python3".to_string(),
                args: vec!["scripts/clip_score.py".to_string()],
                timeout: Some(Duration::from_secs(DEFAULT_PROCESS_TIMEOUT_SECS)),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = AppConfig::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ClipError::Configuration(format!("PORT must be a port number, got '{}'", raw)))?,
            None => defaults.port,
        };

        let process_timeout = match get("CLIP_PROCESS_TIMEOUT_SECS") {
            Some(raw) => match parse_secs("CLIP_PROCESS_TIMEOUT_SECS", &raw)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => defaults.process.timeout,
        };

        let probe_timeout = get("CLIP_PROBE_TIMEOUT_SECS")
            .map(|raw| parse_secs("CLIP_PROBE_TIMEOUT_SECS", &raw))
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let args = match get("CLIP_PROCESS_ARGS") {
            Some(raw) => raw.split_whitespace().map(str::to_string).collect(),
            None => defaults.process.args,
        };

        Ok(AppConfig {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            model: get("CLIP_MODEL").unwrap_or(defaults.model),
            huggingface_token: get("HUGGINGFACE_TOKEN"),
            probe_timeout,
            process: ProcessConfig {
                program: get("CLIP_PROCESS_COMMAND").unwrap_or(defaults.process.program),
                args,
                timeout: process_timeout,
            },
        })
    }

    /// Fails when the evaluation token is absent.
    pub fn require_token(&self) -> Result<&str> {
        self.huggingface_token
            .as_deref()
            .ok_or_else(|| ClipError::Configuration("Hugging Face API token not configured".to_string()))
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|_| ClipError::Configuration(format!("{} must be a whole number of seconds, got '{}'", key, raw)))
}
