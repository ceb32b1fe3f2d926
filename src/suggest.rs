//! Improvement suggestions for weak dimensions.

use crate::model::{strip_code_fence, LanguageModel, ModelError};
use crate::types::request::ChangeRequest;
use crate::types::scoring::{Dimension, Score, ScoreBreakdown};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Returned, alone, when no dimension falls below the suggestion threshold.
pub const ALL_CLEAR_MESSAGE: &str = "Great job! This change request meets all quality standards.";

pub fn fallback_suggestion(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Clarity => "Consider adding a more descriptive title and detailed description",
        Dimension::Context => "Provide more context about why this change is needed",
        Dimension::Completeness => "Add tests and update documentation if needed",
        Dimension::TicketLink => "Link this change request to the relevant ticket",
    }
}

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(
        &self,
        request: &ChangeRequest,
        weak: &[Dimension],
    ) -> Result<Vec<String>, ModelError>;
}

pub struct ModelSuggestions {
    model: Arc<dyn LanguageModel>,
    max_tokens: u32,
    temperature: f32,
}

impl ModelSuggestions {
    pub fn new(model: Arc<dyn LanguageModel>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl SuggestionSource for ModelSuggestions {
    async fn suggest(
        &self,
        request: &ChangeRequest,
        weak: &[Dimension],
    ) -> Result<Vec<String>, ModelError> {
        let prompt = suggestion_prompt(request, weak);
        let completion = self
            .model
            .complete(&prompt, self.max_tokens, self.temperature)
            .await?;
        parse_suggestions(&completion)
    }
}

/// One fixed suggestion per weak dimension, in canonical order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSuggestions;

impl FallbackSuggestions {
    pub fn suggestions(&self, weak: &[Dimension]) -> Vec<String> {
        Dimension::ALL
            .into_iter()
            .filter(|dimension| weak.contains(dimension))
            .map(|dimension| fallback_suggestion(dimension).to_string())
            .collect()
    }
}

#[async_trait]
impl SuggestionSource for FallbackSuggestions {
    async fn suggest(
        &self,
        _request: &ChangeRequest,
        weak: &[Dimension],
    ) -> Result<Vec<String>, ModelError> {
        Ok(self.suggestions(weak))
    }
}

pub struct SuggestionGenerator {
    primary: Box<dyn SuggestionSource>,
    fallback: FallbackSuggestions,
    threshold: Score,
}

impl SuggestionGenerator {
    pub fn new(primary: Box<dyn SuggestionSource>, threshold: Score) -> Self {
        Self {
            primary,
            fallback: FallbackSuggestions,
            threshold,
        }
    }

    pub async fn generate(
        &self,
        request: &ChangeRequest,
        breakdown: &ScoreBreakdown,
    ) -> Vec<String> {
        let weak = breakdown.weak_dimensions(self.threshold);
        if weak.is_empty() {
            return vec![ALL_CLEAR_MESSAGE.to_string()];
        }

        match self.primary.suggest(request, &weak).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                tracing::warn!(
                    request_id = %request.id,
                    %error,
                    "suggestion generation fell back to fixed suggestions"
                );
                self.fallback.suggestions(&weak)
            }
        }
    }
}

fn suggestion_prompt(request: &ChangeRequest, weak: &[Dimension]) -> String {
    let areas = weak
        .iter()
        .map(|dimension| dimension.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Suggest 2-3 specific, actionable improvements for a code change request \
         that scored low in: {areas}.\n\
         \n\
         Title: {title}\n\
         Description: {description}\n\
         \n\
         Keep each suggestion short and concrete.\n\
         Respond with a JSON array of strings only.",
        title = request.title,
        description = request.description_text(),
    )
}

/// Accepts a JSON array of strings; entries are trimmed, blanks dropped and
/// repeats removed. An array that ends up empty counts as malformed.
pub fn parse_suggestions(completion: &str) -> Result<Vec<String>, ModelError> {
    let text = strip_code_fence(completion);
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ModelError::Malformed(format!("suggestions are not JSON: {e}")))?;
    let Value::Array(items) = value else {
        return Err(ModelError::Malformed(
            "suggestions are not a JSON array".to_string(),
        ));
    };

    let mut seen = HashSet::new();
    let mut suggestions = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(text) = item else {
            return Err(ModelError::Malformed(
                "suggestion array contains a non-string entry".to_string(),
            ));
        };
        let text = text.trim();
        if !text.is_empty() && seen.insert(text.to_string()) {
            suggestions.push(text.to_string());
        }
    }

    if suggestions.is_empty() {
        return Err(ModelError::Malformed(
            "suggestion array has no usable entries".to_string(),
        ));
    }
    Ok(suggestions)
}
