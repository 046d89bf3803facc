//! Pipeline YAML parsing with environment variable substitution.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::types::PipelineConfig;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Substitute `${VAR_NAME}` patterns with environment variable values.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut missing = Vec::new();
    let result = ENV_VAR_RE.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_name = &cap[1];
        std::env::var(var_name).unwrap_or_else(|_| {
            missing.push(var_name.to_string());
            String::new()
        })
    });

    if !missing.is_empty() {
        missing.sort_unstable();
        missing.dedup();
        anyhow::bail!("Missing environment variable(s): {}", missing.join(", "));
    }

    Ok(result.into_owned())
}

/// Parse a pipeline YAML string (after env var substitution).
///
/// # Errors
///
/// Returns an error if env var substitution fails or the YAML is invalid.
pub fn parse_pipeline_str(yaml_str: &str) -> Result<PipelineConfig> {
    let substituted = substitute_env_vars(yaml_str)?;
    if substituted.trim().is_empty() {
        return Ok(PipelineConfig::default());
    }
    let config: PipelineConfig =
        serde_yaml::from_str(&substituted).context("Failed to parse pipeline YAML")?;
    Ok(config)
}

/// Parse a pipeline YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn parse_pipeline(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pipeline file: {}", path.display()))?;
    parse_pipeline_str(&content)
}

/// Parse `path` when given, otherwise use the built-in defaults.
///
/// # Errors
///
/// Propagates [`parse_pipeline`] errors.
pub fn load_pipeline(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => parse_pipeline(path),
        None => Ok(PipelineConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MH_TEST_HOST", "db.example.com");
        let input = "uri: mongodb://${MH_TEST_HOST}:27017";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "uri: mongodb://db.example.com:27017");
        std::env::remove_var("MH_TEST_HOST");
    }

    #[test]
    fn test_no_env_vars_passthrough() {
        let input = "source:\n  url: https://huggingface.co/api/models";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_multiple_missing_env_vars_all_reported() {
        let input = "${MH_MISSING_X} and ${MH_MISSING_Y}";
        let err_msg = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err_msg.contains("MH_MISSING_X"));
        assert!(err_msg.contains("MH_MISSING_Y"));
    }

    #[test]
    fn test_repeated_missing_env_var_reported_once() {
        let input = "${MH_MISSING_B} ${MH_MISSING_A} ${MH_MISSING_B}";
        let err_msg = substitute_env_vars(input).unwrap_err().to_string();
        assert_eq!(
            err_msg,
            "Missing environment variable(s): MH_MISSING_A, MH_MISSING_B"
        );
    }

    #[test]
    fn test_parse_pipeline_from_string() {
        std::env::set_var("MH_TEST_TOKEN", "hf_secret");
        let yaml = r#"
version: "1.0"
pipeline: nightly_models
source:
  url: https://huggingface.co/api/models?limit=500
  token: ${MH_TEST_TOKEN}
sink:
  database: hub
run:
  max_models: null
  batch_size: 250
"#;
        let config = parse_pipeline_str(yaml).unwrap();
        assert_eq!(config.pipeline, "nightly_models");
        assert_eq!(config.source.token.as_deref(), Some("hf_secret"));
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.sink.database, "hub");
        assert_eq!(config.sink.collection, "models");
        assert_eq!(config.run.max_models, None);
        assert_eq!(config.run.batch_size, 250);
        std::env::remove_var("MH_TEST_TOKEN");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_pipeline_str("\n").unwrap();
        assert_eq!(config.run.max_models, Some(1_000));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = parse_pipeline_str("sink:\n  table: models\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_pipeline_file_not_found() {
        let err_msg = parse_pipeline(Path::new("/nonexistent/pipeline.yaml"))
            .unwrap_err()
            .to_string();
        assert!(err_msg.contains("Failed to read pipeline file"));
    }

    #[test]
    fn test_load_pipeline_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pipeline: from_file\nrun:\n  batch_size: 5").unwrap();
        let config = load_pipeline(Some(file.path())).unwrap();
        assert_eq!(config.pipeline, "from_file");
        assert_eq!(config.run.batch_size, 5);
    }

    #[test]
    fn test_load_pipeline_without_path_uses_defaults() {
        let config = load_pipeline(None).unwrap();
        assert_eq!(config.pipeline, "huggingface_models");
    }
}
