//! Pipeline configuration types. Every section is optional in YAML and falls
//! back to the defaults below.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_PIPELINE_NAME: &str = "huggingface_models";
pub const DEFAULT_SOURCE_URL: &str = "https://huggingface.co/api/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_SINK_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "huggingface_etl";
pub const DEFAULT_COLLECTION: &str = "models";
pub const DEFAULT_LOG_FILE: &str = "logs/huggingface_etl.log";
pub const DEFAULT_MAX_MODELS: usize = 1_000;
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_pipeline_name")]
    pub pipeline: String,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub run: RunConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            pipeline: default_pipeline_name(),
            source: SourceConfig::default(),
            sink: SinkConfig::default(),
            logging: LoggingConfig::default(),
            run: RunConfig::default(),
        }
    }
}

/// Upstream API endpoint and request behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause after every successful page fetch.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            token: None,
        }
    }
}

/// Document store connection and target collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkConfig {
    #[serde(default = "default_sink_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            uri: default_sink_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

/// Per-run limits; overridable from the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Record budget for extraction. `null` means unbounded.
    #[serde(default = "default_max_models")]
    pub max_models: Option<usize>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl RunConfig {
    /// Convert to validated run limits.
    ///
    /// # Errors
    ///
    /// Returns an error when `batch_size` is zero.
    pub fn limits(&self) -> anyhow::Result<RunLimits> {
        let batch_size = NonZeroUsize::new(self.batch_size)
            .ok_or_else(|| anyhow::anyhow!("batch_size must be at least 1"))?;
        Ok(RunLimits {
            max_models: self.max_models,
            batch_size,
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_models: default_max_models(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Record budget and batch size for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    pub max_models: Option<usize>,
    pub batch_size: NonZeroUsize,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_pipeline_name() -> String {
    DEFAULT_PIPELINE_NAME.to_string()
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_delay_ms() -> u64 {
    DEFAULT_PAGE_DELAY_MS
}

fn default_sink_uri() -> String {
    DEFAULT_SINK_URI.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

#[allow(clippy::unnecessary_wraps)]
fn default_max_models() -> Option<usize> {
    Some(DEFAULT_MAX_MODELS)
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_deployment() {
        let config = PipelineConfig::default();
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.source.timeout(), Duration::from_secs(30));
        assert_eq!(config.source.page_delay(), Duration::from_secs(1));
        assert_eq!(config.sink.database, "huggingface_etl");
        assert_eq!(config.sink.collection, "models");
        assert_eq!(config.run.max_models, Some(1_000));
        assert_eq!(config.run.batch_size, 100);
    }

    #[test]
    fn zero_batch_size_has_no_limits() {
        let run = RunConfig {
            max_models: None,
            batch_size: 0,
        };
        assert!(run.limits().is_err());
    }

    #[test]
    fn limits_carry_budget() {
        let run = RunConfig {
            max_models: Some(7),
            batch_size: 3,
        };
        let limits = run.limits().unwrap();
        assert_eq!(limits.max_models, Some(7));
        assert_eq!(limits.batch_size.get(), 3);
    }
}
