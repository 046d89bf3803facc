//! Run bookkeeping: stage tracking, counters, and the final summary.

use std::fmt;
use std::time::{Duration, Instant};

/// Orchestration stage. Stages only move forward; a failure jumps straight
/// to [`Stage::Summarizing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Init,
    Extracting,
    Validating,
    Loading,
    Summarizing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Extracting => "extracting",
            Self::Validating => "validating",
            Self::Loading => "loading",
            Self::Summarizing => "summarizing",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Mutable state of one pipeline run, threaded through every stage.
#[derive(Debug)]
pub struct PipelineRun {
    started: Instant,
    stage: Stage,
    failed_stage: Option<Stage>,
    processed: u64,
    errors: u64,
    extracted: u64,
    validated: u64,
    batches: u64,
    sink_rejected: u64,
}

impl PipelineRun {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            stage: Stage::Init,
            failed_stage: None,
            processed: 0,
            errors: 0,
            extracted: 0,
            validated: 0,
            batches: 0,
            sink_rejected: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Move to `next`. Backwards or repeated transitions are ignored.
    pub(crate) fn enter(&mut self, next: Stage) {
        if next <= self.stage {
            tracing::debug!(current = %self.stage, requested = %next, "Ignoring stage re-entry");
            return;
        }
        tracing::debug!(from = %self.stage, to = %next, "Pipeline stage transition");
        self.stage = next;
    }

    pub(crate) fn record_error(&mut self) {
        self.errors += 1;
    }

    pub(crate) fn record_processed(&mut self, count: usize) {
        self.processed += count as u64;
    }

    pub(crate) fn record_extracted(&mut self, count: usize) {
        self.extracted += count as u64;
    }

    pub(crate) fn record_validated(&mut self, count: usize) {
        self.validated += count as u64;
    }

    pub(crate) fn record_batch(&mut self, rejected: usize) {
        self.batches += 1;
        self.sink_rejected += rejected as u64;
    }

    /// Remember the stage that failed; the caller then summarizes.
    pub(crate) fn mark_failed(&mut self) {
        self.failed_stage = Some(self.stage);
    }

    /// Run the summarizing step and consume the run.
    pub(crate) fn finish(mut self) -> RunSummary {
        self.enter(Stage::Summarizing);
        let summary = RunSummary {
            processed: self.processed,
            errors: self.errors,
            extracted: self.extracted,
            validated: self.validated,
            batches: self.batches,
            sink_rejected: self.sink_rejected,
            duration: self.started.elapsed(),
            failed_stage: self.failed_stage,
        };
        tracing::info!(
            processed = summary.processed,
            errors = summary.errors,
            extracted = summary.extracted,
            validated = summary.validated,
            batches = summary.batches,
            sink_rejected = summary.sink_rejected,
            duration_secs = summary.duration.as_secs_f64(),
            failed_stage = summary.failed_stage.map(|s| s.to_string()),
            "ETL summary"
        );
        self.enter(Stage::Done);
        summary
    }
}

/// Counters and timing reported at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Records submitted to the sink in batches that did not fail outright.
    pub processed: u64,
    /// Extraction failures, per-record validation failures and failed batches.
    pub errors: u64,
    pub extracted: u64,
    pub validated: u64,
    /// Batches the sink accepted (fully or partially).
    pub batches: u64,
    /// Documents the sink reported as rejected inside accepted batches.
    /// Not subtracted from `processed`.
    pub sink_rejected: u64,
    pub duration: Duration,
    /// Stage that aborted the run, if any.
    pub failed_stage: Option<Stage>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.failed_stage.is_none()
    }
}

/// Outcome of a single connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub message: String,
}

impl ValidationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Success,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Failed,
            message: message.into(),
        }
    }
}

/// Result of a pipeline check.
#[derive(Debug)]
pub struct CheckResult {
    pub source_validation: ValidationResult,
    pub sink_validation: ValidationResult,
}

impl CheckResult {
    pub fn all_ok(&self) -> bool {
        self.source_validation.status == ValidationStatus::Success
            && self.sink_validation.status == ValidationStatus::Success
    }
}
