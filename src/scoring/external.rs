// src/scoring/external.rs

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use tokio::process::Command;

use crate::config::ProcessConfig;
use crate::errors::{ClipError, Result};
use crate::scoring::{Score, ScoringStrategy};

/// Delegates scoring to an external program.
///
/// The program is run as `<program> <args...> <image_url> <text>` and must
/// print a single JSON object such as
/// `{"similarity_score": 24.7, "model": "openai/clip-vit-base-patch32"}`.
/// A non-zero exit status marks a failure; its stderr becomes the message.
pub struct ProcessScorer {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    model: String,
}

#[derive(Deserialize)]
struct ProcessOutput {
    similarity_score: Option<f64>,
    model: Option<String>,
    success: Option<bool>,
    error: Option<String>,
}

impl ProcessScorer {
    pub fn new(config: ProcessConfig, model: impl Into<String>) -> Self {
        Self {
            program: config.program,
            args: config.args,
            timeout: config.timeout,
            model: model.into(),
        }
    }

    fn parse_output(&self, stdout: &str) -> Result<Score> {
        let output: ProcessOutput = serde_json::from_str(stdout.trim())
            .map_err(|e| ClipError::ProcessOutput(e.to_string()))?;

        if output.success == Some(false) {
            return Err(ClipError::ProcessFailed(
                output.error.unwrap_or_else(|| "scorer reported failure".to_string()),
            ));
        }

        let similarity_score = output.similarity_score.ok_or_else(|| {
            ClipError::ProcessOutput("missing numeric similarity_score".to_string())
        })?;

        Ok(Score {
            similarity_score,
            model: output.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

/// The message for a failed run: stderr when present, otherwise an `error`
/// field the scorer may have printed as JSON on stdout.
fn failure_message(stderr: &str, stdout: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    serde_json::from_str::<ProcessOutput>(stdout.trim())
        .ok()
        .and_then(|o| o.error)
        .unwrap_or_else(|| "no diagnostic output".to_string())
}

#[async_trait]
impl ScoringStrategy for ProcessScorer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn score(&self, image_url: &str, text: &str) -> Result<Score> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(image_url)
            .arg(text)
            .kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| ClipError::ProcessStart(format!("{}: {}", self.program, e)))?;

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    warn!("Scorer {} exceeded {:?}, killing it", self.program, limit);
                    ClipError::ProcessTimeout(limit)
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|e| ClipError::ProcessFailed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            "Scorer {} exited with {} after {}ms",
            self.program,
            output.status,
            start.elapsed().as_millis()
        );

        if !output.status.success() {
            return Err(ClipError::ProcessFailed(failure_message(&stderr, &stdout)));
        }

        self.parse_output(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs `script` through `sh -c`; the url and text arrive as `$1` and `$2`.
    fn shell(script: &str, timeout: Option<Duration>) -> ProcessScorer {
        ProcessScorer::new(
            ProcessConfig {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string(), "scorer".to_string()],
                timeout,
            },
            "fallback-model",
        )
    }

    #[tokio::test]
    async fn test_parses_successful_output() {
        let scorer = shell(
            r#"printf '{"success": true, "similarity_score": 24.5, "model": "openai/clip-vit-base-patch32"}'"#,
            None,
        );
        let score = scorer.score("https://example.com/cat.png", "a cat").await.unwrap();
        assert_eq!(score.similarity_score, 24.5);
        assert_eq!(score.model, "openai/clip-vit-base-patch32");
    }

    #[tokio::test]
    async fn test_passes_url_and_text_as_arguments() {
        let scorer = shell(
            r#"[ "$1" = "https://example.com/cat.png" ] && [ "$2" = "a \"quoted\" cat" ] && echo '{"similarity_score": 1.5}'"#,
            None,
        );
        let score = scorer
            .score("https://example.com/cat.png", "a \"quoted\" cat")
            .await
            .unwrap();
        assert_eq!(score.similarity_score, 1.5);
        assert_eq!(score.model, "fallback-model");
    }

    #[tokio::test]
    async fn test_non_zero_exit_reports_stderr() {
        let scorer = shell("echo 'CUDA out of memory' >&2; exit 3", None);
        let err = scorer.score("https://example.com/cat.png", "a cat").await.unwrap_err();
        assert!(matches!(err, ClipError::ProcessFailed(ref msg) if msg == "CUDA out of memory"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_falls_back_to_json_error() {
        let scorer = shell(r#"echo '{"success": false, "error": "cannot identify image file"}'; exit 1"#, None);
        let err = scorer.score("https://example.com/cat.png", "a cat").await.unwrap_err();
        assert!(matches!(err, ClipError::ProcessFailed(ref msg) if msg == "cannot identify image file"));
    }

    #[tokio::test]
    async fn test_unparseable_output() {
        let scorer = shell("echo 'Loading weights...'", None);
        let err = scorer.score("https://example.com/cat.png", "a cat").await.unwrap_err();
        assert!(matches!(err, ClipError::ProcessOutput(_)));

        let scorer = shell(r#"echo '{"model": "clip"}'"#, None);
        let err = scorer.score("https://example.com/cat.png", "a cat").await.unwrap_err();
        assert!(matches!(err, ClipError::ProcessOutput(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_fails_to_start() {
        let scorer = ProcessScorer::new(
            ProcessConfig {
                program: "/nonexistent/clip-scorer".to_string(),
                args: vec![],
                timeout: None,
            },
            "clip",
        );
        let err = scorer.score("https://example.com/cat.png", "a cat").await.unwrap_err();
        assert!(matches!(err, ClipError::ProcessStart(_)));
        assert!(err.to_string().starts_with("Failed to start external process"));
    }

    #[tokio::test]
    async fn test_deadline_stops_hung_process() {
        let scorer = shell("sleep 10", Some(Duration::from_millis(200)));
        let start = Instant::now();
        let err = scorer.score("https://example.com/cat.png", "a cat").await.unwrap_err();
        assert!(matches!(err, ClipError::ProcessTimeout(_)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
