pub mod check;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use modelhub_engine::config::{parser, validator};
use modelhub_engine::PipelineConfig;

/// Run limits given on the command line; they take precedence over the YAML.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub max_models: Option<usize>,
    pub unbounded: bool,
    pub batch_size: Option<usize>,
}

pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => parser::load_pipeline(Some(p))
            .with_context(|| format!("Failed to parse pipeline: {}", p.display())),
        None => parser::load_pipeline(None),
    }
}

pub fn apply_overrides(config: &mut PipelineConfig, overrides: &RunOverrides) {
    if overrides.unbounded {
        config.run.max_models = None;
    } else if let Some(max) = overrides.max_models {
        config.run.max_models = Some(max);
    }
    if let Some(size) = overrides.batch_size {
        config.run.batch_size = size;
    }
}

pub fn validate(config: &PipelineConfig) -> Result<()> {
    validator::validate_pipeline(config)
}
