use crate::error::PrScoreError;
use crate::types::scoring::{Dimension, Score, Thresholds, Weights};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    pub weights: Option<HashMap<String, f64>>,
    pub thresholds: Option<ThresholdsConfig>,
    pub suggestions: Option<SuggestionsConfig>,
    pub heuristics: Option<HeuristicsConfig>,
    pub model: Option<ModelConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    pub excellent: Option<f64>,
    pub good: Option<f64>,
    pub needs_improvement: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionsConfig {
    pub threshold: Option<f64>,
    #[serde(default = "default_use_model")]
    pub use_model: bool,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

fn default_use_model() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeuristicsConfig {
    pub context_keywords: Option<Vec<String>>,
    pub commit_prefixes: Option<Vec<String>>,
    pub in_progress_status: Option<String>,
    #[serde(default)]
    pub detect_test_files: bool,
    pub test_file_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSettings {
    pub threshold: Score,
    pub use_model: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            threshold: 7.0,
            use_model: true,
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicSettings {
    pub context_keywords: Vec<String>,
    pub commit_prefixes: Vec<String>,
    pub in_progress_status: String,
    /// Off by default: only explicit test references earn test credit.
    pub detect_test_files: bool,
    pub test_file_patterns: Vec<String>,
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        Self {
            context_keywords: [
                "because",
                "fixes",
                "addresses",
                "implements",
                "refactor",
                "resolves",
                "closes",
                "updates",
            ]
            .map(String::from)
            .to_vec(),
            commit_prefixes: [
                "feat", "fix", "docs", "style", "refactor", "test", "chore", "perf", "ci", "build",
            ]
            .map(String::from)
            .to_vec(),
            in_progress_status: "In Progress".to_string(),
            detect_test_files: false,
            test_file_patterns: [r"(^|/)test_[^/]*$", r"_test\.[^/]+$", r"(^|/)tests?/"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub command: Option<String>,
    pub args: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            max_tokens: 10,
            temperature: 0.3,
            timeout_secs: 30,
        }
    }
}

const ALLOWED_WEIGHT_KEYS: [&str; 4] = ["clarity", "context", "completeness", "ticket_link"];

impl ScoringConfig {
    pub fn weights(&self) -> Weights {
        let defaults = Weights::default();
        match &self.weights {
            Some(weights) => {
                let pick = |dimension: Dimension| {
                    weights
                        .get(dimension.config_key())
                        .copied()
                        .unwrap_or_else(|| defaults.get(dimension))
                };
                Weights {
                    clarity: pick(Dimension::Clarity),
                    context: pick(Dimension::Context),
                    completeness: pick(Dimension::Completeness),
                    ticket_link: pick(Dimension::TicketLink),
                }
            }
            None => defaults,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        let defaults = Thresholds::default();
        match &self.thresholds {
            Some(thresholds) => Thresholds {
                excellent: thresholds.excellent.unwrap_or(defaults.excellent),
                good: thresholds.good.unwrap_or(defaults.good),
                needs_improvement: thresholds
                    .needs_improvement
                    .unwrap_or(defaults.needs_improvement),
            },
            None => defaults,
        }
    }

    pub fn suggestion_settings(&self) -> SuggestionSettings {
        let defaults = SuggestionSettings::default();
        match &self.suggestions {
            Some(suggestions) => SuggestionSettings {
                threshold: suggestions.threshold.unwrap_or(defaults.threshold),
                use_model: suggestions.use_model,
                max_tokens: suggestions.max_tokens.unwrap_or(defaults.max_tokens),
                temperature: suggestions.temperature.unwrap_or(defaults.temperature),
            },
            None => defaults,
        }
    }

    pub fn heuristic_settings(&self) -> HeuristicSettings {
        let defaults = HeuristicSettings::default();
        match &self.heuristics {
            Some(heuristics) => HeuristicSettings {
                context_keywords: heuristics
                    .context_keywords
                    .clone()
                    .unwrap_or(defaults.context_keywords),
                commit_prefixes: heuristics
                    .commit_prefixes
                    .clone()
                    .unwrap_or(defaults.commit_prefixes),
                in_progress_status: heuristics
                    .in_progress_status
                    .clone()
                    .unwrap_or(defaults.in_progress_status),
                detect_test_files: heuristics.detect_test_files,
                test_file_patterns: heuristics
                    .test_file_patterns
                    .clone()
                    .unwrap_or(defaults.test_file_patterns),
            },
            None => defaults,
        }
    }

    pub fn model_settings(&self) -> ModelSettings {
        let defaults = ModelSettings::default();
        match &self.model {
            Some(model) => ModelSettings {
                command: model
                    .command
                    .as_ref()
                    .map(|command| command.trim().to_string())
                    .filter(|command| !command.is_empty()),
                args: model.args.clone(),
                max_tokens: model.max_tokens.unwrap_or(defaults.max_tokens),
                temperature: model.temperature.unwrap_or(defaults.temperature),
                timeout_secs: model.timeout_secs.unwrap_or(defaults.timeout_secs),
            },
            None => defaults,
        }
    }

    /// Weights are not required to sum to 1.0; a config that drifts from the
    /// convention gets a warning rather than an error.
    pub fn weight_sum_warning(&self) -> Option<String> {
        let sum = self.weights().sum();
        ((sum - 1.0).abs() > 0.001).then(|| {
            format!("weights sum to {sum:.3}; total scores will not stay on the 0-10 scale")
        })
    }

    pub fn validate(&self) -> Result<(), PrScoreError> {
        if let Some(weights) = &self.weights {
            let unknown = weights
                .keys()
                .filter(|key| !ALLOWED_WEIGHT_KEYS.contains(&key.as_str()))
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                return Err(PrScoreError::InvalidConfig(format!(
                    "weights contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
        }
        let weights = self.weights();
        for dimension in Dimension::ALL {
            let weight = weights.get(dimension);
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(PrScoreError::InvalidConfig(format!(
                    "weights.{} must be between 0.0 and 1.0 (found {weight})",
                    dimension.config_key()
                )));
            }
        }

        let thresholds = self.thresholds();
        for (name, value) in [
            ("excellent", thresholds.excellent),
            ("good", thresholds.good),
            ("needs_improvement", thresholds.needs_improvement),
        ] {
            if !value.is_finite() {
                return Err(PrScoreError::InvalidConfig(format!(
                    "thresholds.{name} must be a finite number"
                )));
            }
        }
        if !thresholds.is_monotonic() {
            return Err(PrScoreError::InvalidConfig(format!(
                "thresholds must be non-decreasing: needs_improvement ({}) <= good ({}) <= excellent ({})",
                thresholds.needs_improvement, thresholds.good, thresholds.excellent
            )));
        }

        let suggestions = self.suggestion_settings();
        if !suggestions.threshold.is_finite() {
            return Err(PrScoreError::InvalidConfig(
                "suggestions.threshold must be a finite number".to_string(),
            ));
        }
        if suggestions.max_tokens == 0 {
            return Err(PrScoreError::InvalidConfig(
                "suggestions.max_tokens must be greater than 0".to_string(),
            ));
        }
        validate_temperature("suggestions.temperature", suggestions.temperature)?;

        let heuristics = self.heuristic_settings();
        validate_terms("heuristics.context_keywords", &heuristics.context_keywords)?;
        validate_terms("heuristics.commit_prefixes", &heuristics.commit_prefixes)?;
        validate_terms(
            "heuristics.test_file_patterns",
            &heuristics.test_file_patterns,
        )?;
        for pattern in &heuristics.test_file_patterns {
            if let Err(err) = regex::Regex::new(pattern) {
                return Err(PrScoreError::InvalidConfig(format!(
                    "heuristics.test_file_patterns entry '{pattern}' is not a valid regex: {err}"
                )));
            }
        }

        let model = self.model_settings();
        if model.timeout_secs == 0 {
            return Err(PrScoreError::InvalidConfig(
                "model.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if model.max_tokens == 0 {
            return Err(PrScoreError::InvalidConfig(
                "model.max_tokens must be greater than 0".to_string(),
            ));
        }
        validate_temperature("model.temperature", model.temperature)?;
        if let Some(command) = &model.command {
            if command.chars().any(char::is_whitespace) {
                return Err(PrScoreError::InvalidConfig(format!(
                    "model.command must be a single program (found '{command}'); put its arguments in model.args"
                )));
            }
        }

        Ok(())
    }
}

fn validate_temperature(field: &str, value: f32) -> Result<(), PrScoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PrScoreError::InvalidConfig(format!(
            "{field} must be a finite, non-negative number (found {value})"
        )));
    }
    Ok(())
}

fn validate_terms(field: &str, terms: &[String]) -> Result<(), PrScoreError> {
    let mut seen = HashSet::<String>::new();
    for term in terms {
        let normalized = term.trim();
        if normalized.is_empty() {
            return Err(PrScoreError::InvalidConfig(format!(
                "{field} entries must be non-empty"
            )));
        }
        if !seen.insert(normalized.to_lowercase()) {
            return Err(PrScoreError::InvalidConfig(format!(
                "{field} contains duplicate entry: {normalized}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: ScoringConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(cfg.weights(), Weights::default());
        assert_eq!(cfg.thresholds(), Thresholds::default());
        assert_eq!(cfg.suggestion_settings(), SuggestionSettings::default());
        assert_eq!(cfg.model_settings(), ModelSettings::default());
        assert!(cfg.validate().is_ok());
        assert!(cfg.weight_sum_warning().is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[weights]
clarity = 0.4
context = 0.2
completeness = 0.2
ticket_link = 0.2

[thresholds]
excellent = 9.0
good = 7.5
needs_improvement = 4.0

[suggestions]
threshold = 6.5
use_model = false

[heuristics]
context_keywords = ["because", "motivation"]
commit_prefixes = ["feat", "fix"]
in_progress_status = "Doing"
detect_test_files = true

[model]
command = "llm"
args = ["-m", "gpt-4-turbo"]
timeout_secs = 10
"#;
        let cfg: ScoringConfig = toml::from_str(toml_str).expect("full config should parse");
        assert_eq!(cfg.weights().clarity, 0.4);
        assert_eq!(cfg.thresholds().needs_improvement, 4.0);
        let suggestions = cfg.suggestion_settings();
        assert_eq!(suggestions.threshold, 6.5);
        assert!(!suggestions.use_model);
        assert_eq!(suggestions.max_tokens, 300);
        let heuristics = cfg.heuristic_settings();
        assert_eq!(heuristics.in_progress_status, "Doing");
        assert!(heuristics.detect_test_files);
        assert_eq!(heuristics.context_keywords.len(), 2);
        assert_eq!(
            heuristics.test_file_patterns,
            HeuristicSettings::default().test_file_patterns
        );
        let model = cfg.model_settings();
        assert_eq!(model.command.as_deref(), Some("llm"));
        assert_eq!(model.args, vec!["-m".to_string(), "gpt-4-turbo".to_string()]);
        assert_eq!(model.timeout_secs, 10);
        assert_eq!(model.max_tokens, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_weights_fall_back_per_key() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[weights]
clarity = 0.5
"#,
        )
        .expect("config should parse");
        let weights = cfg.weights();
        assert_eq!(weights.clarity, 0.5);
        assert_eq!(weights.ticket_link, 0.20);
        assert!(cfg.weight_sum_warning().is_some());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_weight_keys() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[weights]
clarity = 0.3
jira_link = 0.2
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unknown key"));
        assert!(err.to_string().contains("jira_link"));
    }

    #[test]
    fn validate_rejects_out_of_range_weight() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[weights]
context = 1.5
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("weights.context"));
    }

    #[test]
    fn validate_rejects_non_monotonic_thresholds() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[thresholds]
excellent = 6.0
good = 7.0
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("non-decreasing"));
    }

    #[test]
    fn validate_accepts_equal_thresholds() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[thresholds]
excellent = 7.0
good = 7.0
needs_improvement = 7.0
"#,
        )
        .expect("config should parse");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_and_duplicate_keywords() {
        let blank: ScoringConfig = toml::from_str(
            r#"
[heuristics]
context_keywords = ["because", " "]
"#,
        )
        .expect("config should parse");
        let err = blank.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("must be non-empty"));

        let duplicate: ScoringConfig = toml::from_str(
            r#"
[heuristics]
commit_prefixes = ["feat", "FEAT"]
"#,
        )
        .expect("config should parse");
        let err = duplicate.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("duplicate entry"));
    }

    #[test]
    fn validate_rejects_invalid_test_pattern() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[heuristics]
test_file_patterns = ["(unclosed"]
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("not a valid regex"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[model]
command = "llm"
timeout_secs = 0
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("model.timeout_secs"));
    }

    #[test]
    fn validate_rejects_command_with_arguments() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[model]
command = "sh -c 'echo 8'"
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("model.command"));
        assert!(err.to_string().contains("model.args"));
    }

    #[test]
    fn validate_rejects_bad_temperatures() {
        let negative: ScoringConfig = toml::from_str(
            r#"
[model]
temperature = -0.5
"#,
        )
        .expect("config should parse");
        let err = negative.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("model.temperature"));

        let not_a_number: ScoringConfig = toml::from_str(
            r#"
[suggestions]
temperature = nan
"#,
        )
        .expect("config should parse");
        let err = not_a_number.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("suggestions.temperature"));
    }

    #[test]
    fn blank_model_command_means_no_model() {
        let cfg: ScoringConfig = toml::from_str(
            r#"
[model]
command = "  "
"#,
        )
        .expect("config should parse");
        assert!(cfg.model_settings().command.is_none());
    }
}
