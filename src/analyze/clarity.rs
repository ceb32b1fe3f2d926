use super::{char_len, Heuristics};
use crate::types::scoring::{Dimension, Score};

/// Rule-based clarity used whenever the model-backed assessment is unavailable.
pub fn clarity_score(heuristics: &Heuristics, title: &str, description: &str) -> Score {
    let mut score: Score = 5.0;
    let title_len = char_len(title);
    if title_len > 10 && title_len < 100 {
        score += 2.0;
    }
    if char_len(description) > 50 {
        score += 2.0;
    }
    if heuristics.is_conventional_title(title) {
        score += 1.0;
    }
    Dimension::Clarity.clamp(score)
}
