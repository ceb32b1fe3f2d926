use crate::error::{PrScoreError, Result};
use crate::types::config::ScoringConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "prscore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".prscore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/prscore/config.toml";

#[derive(Clone, Copy)]
enum EnvValue {
    Number,
    Text,
}

/// Environment variables applied on top of every config file.
const ENV_OVERRIDES: [(&str, &str, &str, EnvValue); 9] = [
    ("PRSCORE_WEIGHT_CLARITY", "weights", "clarity", EnvValue::Number),
    ("PRSCORE_WEIGHT_CONTEXT", "weights", "context", EnvValue::Number),
    ("PRSCORE_WEIGHT_COMPLETENESS", "weights", "completeness", EnvValue::Number),
    ("PRSCORE_WEIGHT_TICKET_LINK", "weights", "ticket_link", EnvValue::Number),
    ("PRSCORE_THRESHOLD_EXCELLENT", "thresholds", "excellent", EnvValue::Number),
    ("PRSCORE_THRESHOLD_GOOD", "thresholds", "good", EnvValue::Number),
    (
        "PRSCORE_THRESHOLD_NEEDS_IMPROVEMENT",
        "thresholds",
        "needs_improvement",
        EnvValue::Number,
    ),
    ("PRSCORE_SUGGESTION_THRESHOLD", "suggestions", "threshold", EnvValue::Number),
    ("PRSCORE_MODEL_COMMAND", "model", "command", EnvValue::Text),
];

/// Loads the layered scoring config for `root`: global file, then the repo
/// file (or `explicit`), then the local override, then environment variables.
/// Missing files are skipped; with nothing present the defaults apply.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<ScoringConfig> {
    dotenvy::dotenv().ok();
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with(root, explicit, global.as_deref(), |key| {
        std::env::var(key).ok()
    })
}

pub(crate) fn load_config_with(
    root: &Path,
    explicit: Option<&Path>,
    global_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ScoringConfig> {
    let repo_path = match explicit {
        Some(path) if !path.exists() => {
            return Err(PrScoreError::PathNotFound(path.display().to_string()));
        }
        Some(path) => path.to_path_buf(),
        None => root.join(DEFAULT_CONFIG_FILE),
    };

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;
    merge_toml(&mut merged, env_overlay(env)?);

    let cfg: ScoringConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| PrScoreError::ConfigParse(e.to_string()))?;
    Ok(cfg)
}

fn env_overlay(env: impl Fn(&str) -> Option<String>) -> Result<Value> {
    let mut overlay = Map::new();
    for (var, section, key, kind) in ENV_OVERRIDES {
        let Some(raw) = env(var) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value = match kind {
            EnvValue::Number => Value::Float(raw.parse::<f64>().map_err(|_| {
                PrScoreError::ConfigParse(format!("{var} must be a number (found '{raw}')"))
            })?),
            EnvValue::Text => Value::String(raw.to_string()),
        };
        let table = overlay
            .entry(section.to_string())
            .or_insert_with(|| Value::Table(Map::new()));
        if let Value::Table(table) = table {
            table.insert(key.to_string(), value);
        }
        tracing::debug!(var, "applied environment override");
    }
    Ok(Value::Table(overlay))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    tracing::debug!(path = %path.display(), "merged config file");
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| PrScoreError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::{Thresholds, Weights};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_files_yield_defaults() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with(dir.path(), None, None, no_env).expect("load should not fail");
        assert_eq!(cfg.weights(), Weights::default());
        assert_eq!(cfg.thresholds(), Thresholds::default());
    }

    #[test]
    fn merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[weights]
clarity = 0.40
context = 0.20

[model]
command = "global-llm"
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[weights]
clarity = 0.35
completeness = 0.25

[thresholds]
excellent = 9.0
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".prscore")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[thresholds]
excellent = 9.5
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with(root.path(), None, Some(&global_path), no_env)
            .expect("load should succeed");

        let weights = cfg.weights();
        assert_eq!(weights.clarity, 0.35);
        assert_eq!(weights.context, 0.20);
        assert_eq!(weights.completeness, 0.25);
        assert_eq!(cfg.thresholds().excellent, 9.5);
        assert_eq!(cfg.model_settings().command.as_deref(), Some("global-llm"));
    }

    #[test]
    fn explicit_path_replaces_repo_file() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[thresholds]\nexcellent = 9.0\n",
        )
        .expect("repo config should write");
        let explicit = root.path().join("team.toml");
        fs::write(&explicit, "[thresholds]\nexcellent = 8.0\n").expect("explicit config should write");

        let cfg = load_config_with(root.path(), Some(&explicit), None, no_env)
            .expect("load should succeed");
        assert_eq!(cfg.thresholds().excellent, 8.0);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        let err = load_config_with(root.path(), Some(&root.path().join("nope.toml")), None, no_env)
            .expect_err("missing explicit config should fail");
        assert!(matches!(err, PrScoreError::PathNotFound(_)));
    }

    #[test]
    fn environment_overrides_beat_files() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[weights]\nclarity = 0.30\n\n[suggestions]\nthreshold = 7.0\n",
        )
        .expect("repo config should write");

        let vars = HashMap::from([
            ("PRSCORE_WEIGHT_CLARITY", "0.5"),
            ("PRSCORE_THRESHOLD_GOOD", "6.5"),
            ("PRSCORE_SUGGESTION_THRESHOLD", " 6 "),
            ("PRSCORE_MODEL_COMMAND", "llm"),
            ("PRSCORE_WEIGHT_CONTEXT", ""),
        ]);
        let cfg = load_config_with(root.path(), None, None, |key| {
            vars.get(key).map(|value| value.to_string())
        })
        .expect("load should succeed");

        assert_eq!(cfg.weights().clarity, 0.5);
        assert_eq!(cfg.weights().context, 0.25);
        assert_eq!(cfg.thresholds().good, 6.5);
        assert_eq!(cfg.suggestion_settings().threshold, 6.0);
        assert_eq!(cfg.model_settings().command.as_deref(), Some("llm"));
    }

    #[test]
    fn environment_command_with_arguments_fails_validation() {
        let root = TempDir::new().expect("root temp dir should be created");
        let cfg = load_config_with(root.path(), None, None, |key| {
            (key == "PRSCORE_MODEL_COMMAND").then(|| "sh -c 'echo 8'".to_string())
        })
        .expect("load should succeed");
        let err = cfg.validate().expect_err("multi-word command should be rejected");
        assert!(matches!(err, PrScoreError::InvalidConfig(_)));
    }

    #[test]
    fn non_numeric_environment_override_is_rejected() {
        let root = TempDir::new().expect("root temp dir should be created");
        let err = load_config_with(root.path(), None, None, |key| {
            (key == "PRSCORE_WEIGHT_CLARITY").then(|| "high".to_string())
        })
        .expect_err("bad override should fail");
        assert!(err.to_string().contains("PRSCORE_WEIGHT_CLARITY"));
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[weights\nclarity = ")
            .expect("repo config should write");
        let err = load_config_with(root.path(), None, None, no_env)
            .expect_err("malformed config should fail");
        assert!(matches!(err, PrScoreError::ConfigParse(_)));
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn wrongly_typed_value_is_a_parse_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[weights]\nclarity = \"high\"\n",
        )
        .expect("repo config should write");
        let err = load_config_with(root.path(), None, None, no_env)
            .expect_err("typed config should fail");
        assert!(matches!(err, PrScoreError::ConfigParse(_)));
    }
}
