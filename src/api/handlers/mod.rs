// src/api/handlers/mod.rs
mod evals;
mod fallback;
mod health;

pub use evals::{batch_evaluate, clip_evaluate, evaluate_text_image};
pub use fallback::{method_not_allowed, not_found, preflight};
pub use health::{api_info, clip_health, health_check};
