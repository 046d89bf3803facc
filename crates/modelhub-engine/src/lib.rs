//! Extract-validate-load pipeline for model hub metadata.
//!
//! Pages model listings from an HTTP API, keeps a fixed subset of fields per
//! model, and inserts the result into a document store in batches.

pub mod config;
pub mod error;
pub mod execution;
pub mod extract;
pub mod load;
pub mod orchestrator;
pub mod record;
pub mod result;
pub mod sink;
pub mod source;
pub mod validate;

#[cfg(test)]
mod testing;

// Re-export public API for convenience
pub use config::types::{PipelineConfig, RunLimits};
pub use error::{ErrorScope, PipelineError};
pub use execution::ExecutionOptions;
pub use extract::Extractor;
pub use orchestrator::{check_pipeline, Pipeline};
pub use record::{CleanRecord, RawRecord};
pub use result::{CheckResult, PipelineRun, RunSummary, Stage, ValidationResult, ValidationStatus};
pub use sink::{InsertReport, SinkClient};
pub use source::{Page, SourceClient};
