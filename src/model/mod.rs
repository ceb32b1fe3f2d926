//! Language-model client seam.
//!
//! The engine only ever sees [`LanguageModel`]. Any failure it reports is
//! absorbed by the caller's fallback path, so implementations are free to
//! fail fast instead of retrying.

pub mod command;

pub use command::CommandModel;

use crate::types::config::ModelSettings;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Transport, timeout, quota or process failure.
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The model answered, but not in the expected shape.
    #[error("malformed model output: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError>;
}

/// Builds the client described by `[model]`. `None` when no command is
/// configured or the caller asked to stay offline.
pub fn from_settings(settings: &ModelSettings, offline: bool) -> Option<Arc<dyn LanguageModel>> {
    if offline {
        return None;
    }
    let command = settings.command.as_ref()?;
    let model: Arc<dyn LanguageModel> = Arc::new(CommandModel::new(
        command.clone(),
        settings.args.clone(),
        Duration::from_secs(settings.timeout_secs),
    ));
    Some(model)
}

/// Strips a surrounding markdown code fence (```` ```json ... ``` ````) if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `text`, ...) on the opening line.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}
