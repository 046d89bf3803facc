//! Semantic validation for parsed pipeline configuration values.

use anyhow::{bail, Result};

use crate::config::types::PipelineConfig;

const SUPPORTED_VERSION: &str = "1.0";

/// Validate a parsed pipeline configuration.
/// Returns `Ok(())` if valid, Err with all validation errors if not.
///
/// # Errors
///
/// Returns an error listing all validation failures found in the pipeline config.
pub fn validate_pipeline(config: &PipelineConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.version != SUPPORTED_VERSION {
        errors.push(format!(
            "Unsupported pipeline version '{}', expected '{SUPPORTED_VERSION}'",
            config.version
        ));
    }

    if config.pipeline.trim().is_empty() {
        errors.push("Pipeline name must not be empty".to_string());
    }

    let url = config.source.url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(format!(
            "Source url '{}' must start with http:// or https://",
            config.source.url
        ));
    }

    if config.source.timeout_secs == 0 {
        errors.push("source.timeout_secs must be > 0".to_string());
    }

    let uri = config.sink.uri.trim();
    if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
        errors.push("sink.uri must start with mongodb:// or mongodb+srv://".to_string());
    }

    if config.sink.database.trim().is_empty() {
        errors.push("sink.database must not be empty".to_string());
    }

    if config.sink.collection.trim().is_empty() {
        errors.push("sink.collection must not be empty".to_string());
    }

    if config.logging.file.as_os_str().is_empty() {
        errors.push("logging.file must not be empty".to_string());
    }

    if config.run.batch_size == 0 {
        errors.push("run.batch_size must be at least 1".to_string());
    }

    if !errors.is_empty() {
        bail!(
            "Pipeline validation failed:\n  - {}",
            errors.join("\n  - ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_pipeline(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = PipelineConfig::default();
        config.run.batch_size = 0;
        let err = validate_pipeline(&config).unwrap_err().to_string();
        assert!(err.contains("batch_size"));
    }

    #[test]
    fn test_non_http_source_rejected() {
        let mut config = PipelineConfig::default();
        config.source.url = "ftp://huggingface.co/api/models".to_string();
        let err = validate_pipeline(&config).unwrap_err().to_string();
        assert!(err.contains("ftp://huggingface.co/api/models"));
    }

    #[test]
    fn test_srv_uri_accepted() {
        let mut config = PipelineConfig::default();
        config.sink.uri = "mongodb+srv://cluster0.example.net".to_string();
        assert!(validate_pipeline(&config).is_ok());
    }

    #[test]
    fn test_all_errors_reported_together() {
        let mut config = PipelineConfig::default();
        config.version = "2.0".to_string();
        config.pipeline = " ".to_string();
        config.source.timeout_secs = 0;
        config.sink.uri = "postgres://localhost".to_string();
        config.sink.database = String::new();
        config.sink.collection = String::new();
        config.logging.file = PathBuf::new();
        let err = validate_pipeline(&config).unwrap_err().to_string();
        assert!(err.contains("Unsupported pipeline version '2.0'"));
        assert!(err.contains("Pipeline name"));
        assert!(err.contains("timeout_secs"));
        assert!(err.contains("sink.uri"));
        assert!(err.contains("sink.database"));
        assert!(err.contains("sink.collection"));
        assert!(err.contains("logging.file"));
    }
}
