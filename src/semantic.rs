//! Clarity assessment.
//!
//! Two [`ClarityAssessor`] implementations exist side by side: [`ModelClarity`]
//! asks the language model, [`HeuristicClarity`] applies the deterministic
//! rules. [`SemanticEvaluator`] tries the first and falls back to the second.

use crate::analyze::{clarity::clarity_score, Heuristics};
use crate::model::{strip_code_fence, LanguageModel, ModelError};
use crate::types::scoring::{Dimension, Score};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ClarityAssessor: Send + Sync {
    async fn assess(&self, title: &str, description: &str) -> Result<Score, ModelError>;
}

pub struct ModelClarity {
    model: Arc<dyn LanguageModel>,
    max_tokens: u32,
    temperature: f32,
}

impl ModelClarity {
    pub fn new(model: Arc<dyn LanguageModel>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl ClarityAssessor for ModelClarity {
    async fn assess(&self, title: &str, description: &str) -> Result<Score, ModelError> {
        let prompt = clarity_prompt(title, description);
        let completion = self
            .model
            .complete(&prompt, self.max_tokens, self.temperature)
            .await?;
        parse_clarity(&completion)
    }
}

#[derive(Debug, Clone)]
pub struct HeuristicClarity {
    heuristics: Arc<Heuristics>,
}

impl HeuristicClarity {
    pub fn new(heuristics: Arc<Heuristics>) -> Self {
        Self { heuristics }
    }

    pub fn score(&self, title: &str, description: &str) -> Score {
        clarity_score(&self.heuristics, title, description)
    }
}

#[async_trait]
impl ClarityAssessor for HeuristicClarity {
    async fn assess(&self, title: &str, description: &str) -> Result<Score, ModelError> {
        Ok(self.score(title, description))
    }
}

pub struct SemanticEvaluator {
    primary: Box<dyn ClarityAssessor>,
    fallback: HeuristicClarity,
}

impl SemanticEvaluator {
    pub fn new(primary: Box<dyn ClarityAssessor>, fallback: HeuristicClarity) -> Self {
        Self { primary, fallback }
    }

    /// Always yields a score in [1, 10]; model failures never escape.
    pub async fn evaluate_clarity(
        &self,
        request_id: &str,
        title: &str,
        description: &str,
    ) -> Score {
        match self.primary.assess(title, description).await {
            Ok(score) => score,
            Err(error) => {
                tracing::warn!(request_id, %error, "clarity assessment fell back to heuristics");
                self.fallback.score(title, description)
            }
        }
    }
}

fn clarity_prompt(title: &str, description: &str) -> String {
    format!(
        "Rate the clarity of this code change request on a scale from 1 to 10.\n\
         \n\
         Title: {title}\n\
         Description: {description}\n\
         \n\
         Consider whether:\n\
         - the title is clear and descriptive\n\
         - the description is well structured\n\
         - grammar and spelling are correct\n\
         - the intent of the change is easy to understand\n\
         \n\
         Answer with a single number between 1 and 10 and nothing else."
    )
}

/// Parses a bare number, clamping it into the clarity range.
pub fn parse_clarity(completion: &str) -> Result<Score, ModelError> {
    let text = strip_code_fence(completion);
    if text.is_empty() {
        return Err(ModelError::Malformed("empty clarity response".to_string()));
    }
    let score: Score = text
        .parse()
        .map_err(|_| ModelError::Malformed(format!("clarity response is not a number: {text:?}")))?;
    if !score.is_finite() {
        return Err(ModelError::Malformed(format!(
            "clarity response is not finite: {text:?}"
        )));
    }
    Ok(Dimension::Clarity.clamp(score))
}
