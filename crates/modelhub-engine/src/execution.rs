//! Execution mode types for pipeline runs.

/// Runtime execution options (not part of pipeline YAML config).
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Skip the document store and print clean records to stdout as JSON lines.
    pub dry_run: bool,
}
