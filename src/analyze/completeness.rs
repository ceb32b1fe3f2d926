use super::{char_len, Heuristics};
use crate::types::request::ChangeRequest;
use crate::types::scoring::{Dimension, Score};

const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

pub fn completeness_score(heuristics: &Heuristics, request: &ChangeRequest) -> Score {
    let mut score: Score = 5.0;

    if char_len(&request.title) > 10 {
        score += 1.0;
    }
    if char_len(request.description_text()) > 50 {
        score += 1.0;
    }
    if !request.files.is_empty() {
        score += 1.0;
    }

    if !request.tests.is_empty() {
        score += 2.0;
    } else if heuristics.detects_test_files()
        && request
            .files
            .iter()
            .any(|file| heuristics.is_test_file(&file.filename))
    {
        score += 1.5;
    }

    if request.files.iter().any(|file| is_documentation(&file.filename)) {
        score += 1.0;
    }

    Dimension::Completeness.clamp(score)
}

fn is_documentation(filename: &str) -> bool {
    let lowered = filename.to_lowercase();
    lowered.contains("readme")
        || MARKDOWN_EXTENSIONS
            .iter()
            .any(|extension| lowered.ends_with(extension))
}
