pub mod json;
pub mod md;

use crate::error::PrScoreError;
use crate::types::scoring::ScoringResult;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(result: &ScoringResult, format: OutputFormat) -> Result<String, PrScoreError> {
    match format {
        OutputFormat::Json => json::to_json(result).map_err(PrScoreError::Json),
        OutputFormat::Md => Ok(md::to_markdown(result)),
    }
}
