use super::{char_len, Heuristics};
use crate::types::request::ChangeRequest;
use crate::types::scoring::{Dimension, Score};

const FOCUSED_MAX_FILES: usize = 5;
const BROAD_MIN_FILES: usize = 10;

pub fn context_score(heuristics: &Heuristics, request: &ChangeRequest) -> Score {
    let description = request.description_text();
    let mut score: Score = 5.0;

    let description_len = char_len(description);
    if description_len > 100 {
        score += 1.5;
    }
    if description_len > 300 {
        score += 1.0;
    }
    if heuristics.has_context_keyword(description) {
        score += 1.5;
    }

    // An empty file list is neither focused nor broad.
    let file_count = request.files.len();
    if (1..=FOCUSED_MAX_FILES).contains(&file_count) {
        score += 1.0;
    } else if file_count > BROAD_MIN_FILES {
        score -= 1.0;
    }

    Dimension::Context.clamp(score)
}
