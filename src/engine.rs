use crate::analyze::completeness::completeness_score;
use crate::analyze::context::context_score;
use crate::analyze::ticket_link::ticket_link_score;
use crate::analyze::Heuristics;
use crate::error::{PrScoreError, Result};
use crate::model::LanguageModel;
use crate::semantic::{ClarityAssessor, HeuristicClarity, ModelClarity, SemanticEvaluator};
use crate::suggest::{FallbackSuggestions, ModelSuggestions, SuggestionGenerator, SuggestionSource};
use crate::types::config::ScoringConfig;
use crate::types::request::ChangeRequest;
use crate::types::scoring::{
    round_to_tenth, ScoreBreakdown, ScoringResult, Thresholds, Weights,
};
use chrono::Utc;
use std::sync::Arc;

/// Composite scorer.
///
/// Built once from a validated [`ScoringConfig`] and shared freely: nothing
/// inside changes after construction, so concurrent calls to
/// [`ScoringEngine::score`] need no coordination. Separate engines with
/// different configs can live side by side in one process.
pub struct ScoringEngine {
    heuristics: Arc<Heuristics>,
    weights: Weights,
    thresholds: Thresholds,
    semantic: SemanticEvaluator,
    suggestions: SuggestionGenerator,
}

impl ScoringEngine {
    /// With `model` of `None` every dimension is scored by the deterministic
    /// rules and suggestions come from the fixed map.
    pub fn new(config: &ScoringConfig, model: Option<Arc<dyn LanguageModel>>) -> Result<Self> {
        config.validate()?;
        if let Some(warning) = config.weight_sum_warning() {
            tracing::warn!(%warning, "unconventional scoring weights");
        }

        let heuristics = Arc::new(Heuristics::new(&config.heuristic_settings())?);
        let model_settings = config.model_settings();
        let suggestion_settings = config.suggestion_settings();

        let heuristic_clarity = HeuristicClarity::new(Arc::clone(&heuristics));
        let clarity: Box<dyn ClarityAssessor> = match &model {
            Some(model) => Box::new(ModelClarity::new(
                Arc::clone(model),
                model_settings.max_tokens,
                model_settings.temperature,
            )),
            None => Box::new(heuristic_clarity.clone()),
        };
        let suggestion_source: Box<dyn SuggestionSource> =
            match (&model, suggestion_settings.use_model) {
                (Some(model), true) => Box::new(ModelSuggestions::new(
                    Arc::clone(model),
                    suggestion_settings.max_tokens,
                    suggestion_settings.temperature,
                )),
                _ => Box::new(FallbackSuggestions),
            };

        Ok(Self {
            heuristics,
            weights: config.weights(),
            thresholds: config.thresholds(),
            semantic: SemanticEvaluator::new(clarity, heuristic_clarity),
            suggestions: SuggestionGenerator::new(suggestion_source, suggestion_settings.threshold),
        })
    }

    /// Scores one change request. Model trouble never surfaces here; the only
    /// error is [`PrScoreError::ScoringFailure`], which signals a defect.
    pub async fn score(&self, request: &ChangeRequest) -> Result<ScoringResult> {
        let clarity = self
            .semantic
            .evaluate_clarity(&request.id, &request.title, request.description_text())
            .await;
        let breakdown = ScoreBreakdown {
            clarity,
            context: context_score(&self.heuristics, request),
            completeness: completeness_score(&self.heuristics, request),
            ticket_link: ticket_link_score(&self.heuristics, request.ticket.as_ref()),
        };
        tracing::debug!(
            request_id = %request.id,
            clarity = breakdown.clarity,
            context = breakdown.context,
            completeness = breakdown.completeness,
            ticket_link = breakdown.ticket_link,
            "computed sub-scores"
        );

        let total = breakdown.weighted_sum(&self.weights);
        if !total.is_finite() {
            return Err(PrScoreError::ScoringFailure(format!(
                "weighted total for {} is not finite ({total})",
                request.id
            )));
        }
        let total_score = round_to_tenth(total);
        let rating = self.thresholds.rating_for(total_score);
        let suggestions = self.suggestions.generate(request, &breakdown).await;

        tracing::info!(
            request_id = %request.id,
            total_score,
            rating = %rating,
            "scored change request"
        );

        Ok(ScoringResult {
            request_id: request.id.clone(),
            total_score,
            breakdown,
            rating,
            suggestions,
            timestamp: Utc::now(),
        })
    }
}
