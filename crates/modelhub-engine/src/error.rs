//! Pipeline error model.
//!
//! Every stage reports failures as a [`PipelineError`]. The variant decides
//! how much work the failure poisons ([`ErrorScope`]): a network failure ends
//! the whole extraction, a validation failure drops one record, a sink
//! failure drops one batch.

use std::fmt;

/// Maximum characters of a record rendered into an error or log line.
const RECORD_PREVIEW_CHARS: usize = 200;

/// Unit of work invalidated by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorScope {
    /// Aborts the current run's extraction.
    Run,
    /// Affects a single batch submitted to the sink.
    Batch,
    /// Affects an individual record.
    Record,
}

impl fmt::Display for ErrorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Run => "run",
            Self::Batch => "batch",
            Self::Record => "record",
        };
        f.write_str(s)
    }
}

/// Categorized pipeline error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Source unreachable, timed out, returned a non-2xx status or an
    /// unreadable body.
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// A single raw record could not be reshaped into a clean record.
    #[error("validation error: {reason} (record: {record})")]
    Validation { reason: String, record: String },

    /// The sink could not attempt a bulk insert at all.
    #[error("sink error on {destination}: {reason}")]
    Sink { destination: String, reason: String },
}

impl PipelineError {
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Build a validation error carrying a truncated rendering of `record`.
    pub fn validation(reason: impl Into<String>, record: &serde_json::Value) -> Self {
        Self::Validation {
            reason: reason.into(),
            record: record_preview(record),
        }
    }

    pub fn sink(destination: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Sink {
            destination: destination.into(),
            reason: reason.into(),
        }
    }

    /// Returns the unit of work this error invalidates.
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::Network { .. } => ErrorScope::Run,
            Self::Sink { .. } => ErrorScope::Batch,
            Self::Validation { .. } => ErrorScope::Record,
        }
    }
}

/// Compact single-line rendering of a record for diagnostics.
pub fn record_preview(record: &serde_json::Value) -> String {
    let rendered = record.to_string();
    if rendered.chars().count() <= RECORD_PREVIEW_CHARS {
        return rendered;
    }
    let mut preview: String = rendered.chars().take(RECORD_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
