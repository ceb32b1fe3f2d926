pub mod clarity;
pub mod completeness;
pub mod context;
pub mod ticket_link;

use crate::error::{PrScoreError, Result};
use crate::types::config::HeuristicSettings;
use regex::Regex;

/// Heuristic settings compiled once at engine construction. Read-only
/// afterwards, so a single instance serves any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Heuristics {
    context_keywords: Vec<String>,
    commit_prefix: Option<Regex>,
    in_progress_status: String,
    detect_test_files: bool,
    test_files: Vec<Regex>,
}

impl Heuristics {
    pub fn new(settings: &HeuristicSettings) -> Result<Self> {
        let context_keywords = settings
            .context_keywords
            .iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        let alternatives = settings
            .commit_prefixes
            .iter()
            .map(|prefix| prefix.trim().trim_end_matches(':'))
            .filter(|prefix| !prefix.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let commit_prefix = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)^(?:{alternatives}):");
            Some(Regex::new(&pattern).map_err(|e| {
                PrScoreError::InvalidConfig(format!("heuristics.commit_prefixes: {e}"))
            })?)
        };

        let test_files = settings
            .test_file_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    PrScoreError::InvalidConfig(format!(
                        "heuristics.test_file_patterns entry '{pattern}': {e}"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            context_keywords,
            commit_prefix,
            in_progress_status: settings.in_progress_status.clone(),
            detect_test_files: settings.detect_test_files,
            test_files,
        })
    }

    pub(crate) fn has_context_keyword(&self, description: &str) -> bool {
        let lowered = description.to_lowercase();
        self.context_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }

    pub(crate) fn is_conventional_title(&self, title: &str) -> bool {
        self.commit_prefix
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(title.trim_start()))
    }

    pub(crate) fn is_test_file(&self, filename: &str) -> bool {
        self.test_files.iter().any(|pattern| pattern.is_match(filename))
    }

    pub(crate) fn detects_test_files(&self) -> bool {
        self.detect_test_files
    }

    pub(crate) fn in_progress_status(&self) -> &str {
        &self.in_progress_status
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
pub(crate) fn default_heuristics() -> Heuristics {
    Heuristics::new(&HeuristicSettings::default()).expect("default heuristics should compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_prefix_requires_type_then_colon() {
        let heuristics = default_heuristics();
        assert!(heuristics.is_conventional_title("feat: add OAuth2 login"));
        assert!(heuristics.is_conventional_title("FIX: expire tokens"));
        assert!(!heuristics.is_conventional_title("Fix(auth): expire tokens"));
        assert!(!heuristics.is_conventional_title("refactor!: drop legacy API"));
        assert!(!heuristics.is_conventional_title("feature: not a type"));
        assert!(!heuristics.is_conventional_title("feat add login"));
        assert!(!heuristics.is_conventional_title("update docs: typo"));
    }

    #[test]
    fn configured_prefixes_may_carry_their_colon() {
        let settings = HeuristicSettings {
            commit_prefixes: vec!["hotfix:".to_string()],
            ..HeuristicSettings::default()
        };
        let heuristics = Heuristics::new(&settings).expect("heuristics should compile");
        assert!(heuristics.is_conventional_title("hotfix: patch release"));
        assert!(!heuristics.is_conventional_title("feat: new thing"));
    }

    #[test]
    fn empty_prefix_list_matches_nothing() {
        let settings = HeuristicSettings {
            commit_prefixes: Vec::new(),
            ..HeuristicSettings::default()
        };
        let heuristics = Heuristics::new(&settings).expect("heuristics should compile");
        assert!(!heuristics.is_conventional_title(": bare colon"));
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let heuristics = default_heuristics();
        assert!(heuristics.has_context_keyword("This IMPLEMENTS the retry loop"));
        assert!(heuristics.has_context_keyword("refactoring the parser"));
        assert!(!heuristics.has_context_keyword("Small tweak"));
    }

    #[test]
    fn default_test_patterns_cover_common_layouts() {
        let heuristics = default_heuristics();
        assert!(heuristics.is_test_file("test_auth.py"));
        assert!(heuristics.is_test_file("pkg/server_test.go"));
        assert!(heuristics.is_test_file("crates/core/tests/engine.rs"));
        assert!(!heuristics.is_test_file("src/contest.rs"));
        assert!(!heuristics.is_test_file("src/latest/mod.rs"));
    }

    #[test]
    fn invalid_test_pattern_is_rejected() {
        let settings = HeuristicSettings {
            test_file_patterns: vec!["[".to_string()],
            ..HeuristicSettings::default()
        };
        let err = Heuristics::new(&settings).expect_err("pattern should not compile");
        assert!(matches!(err, PrScoreError::InvalidConfig(_)));
    }
}
