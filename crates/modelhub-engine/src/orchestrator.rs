//! Pipeline orchestrator: sequences extract, validate and load, then always
//! summarizes the run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::config::types::{PipelineConfig, RunLimits};
use crate::error::PipelineError;
use crate::execution::ExecutionOptions;
use crate::extract::Extractor;
use crate::load;
use crate::result::{CheckResult, PipelineRun, RunSummary, Stage, ValidationResult};
use crate::sink::{JsonLinesSink, MongoSink, SinkClient};
use crate::source::{HttpSourceClient, SourceClient};
use crate::validate;

/// One configured extract-validate-load pipeline.
///
/// Owns its client handles; concurrent runs need separate `Pipeline` values.
pub struct Pipeline {
    source: Box<dyn SourceClient>,
    sink: Box<dyn SinkClient>,
    extractor: Extractor,
    timeout: Duration,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn SourceClient>,
        sink: Box<dyn SinkClient>,
        extractor: Extractor,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            sink,
            extractor,
            timeout,
        }
    }

    /// Build the HTTP source and the configured sink.
    ///
    /// # Errors
    ///
    /// Fails when the document store cannot be reached. Dry runs never
    /// connect to it.
    pub fn from_config(
        config: &PipelineConfig,
        options: &ExecutionOptions,
    ) -> Result<Self, PipelineError> {
        let sink: Box<dyn SinkClient> = if options.dry_run {
            Box::new(JsonLinesSink::new(std::io::stdout(), "stdout"))
        } else {
            Box::new(MongoSink::connect(&config.sink)?)
        };
        Ok(Self::new(
            Box::new(HttpSourceClient::from_config(&config.source)),
            sink,
            Extractor::new(config.source.url.clone(), config.source.page_delay()),
            config.source.timeout(),
        ))
    }

    /// Run the pipeline once.
    ///
    /// Never fails: a stage failure skips the remaining stages and the run is
    /// summarized with whatever counters were reached. A panic raised by a
    /// client is caught and treated as a stage failure.
    pub fn run(&mut self, limits: RunLimits) -> RunSummary {
        let mut run = PipelineRun::start();
        tracing::info!(
            max_models = limits.max_models,
            batch_size = limits.batch_size.get(),
            destination = self.sink.destination(),
            "Starting ETL process"
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(&mut run, limits)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(stage = %run.stage(), scope = %err.scope(), error = %err, "ETL process failed");
                run.mark_failed();
            }
            Err(payload) => {
                tracing::error!(
                    stage = %run.stage(),
                    panic = panic_message(payload.as_ref()),
                    "ETL process panicked"
                );
                run.mark_failed();
            }
        }

        run.finish()
    }

    fn execute(&mut self, run: &mut PipelineRun, limits: RunLimits) -> Result<(), PipelineError> {
        run.enter(Stage::Extracting);
        let raw = self
            .extractor
            .extract(self.source.as_ref(), limits.max_models, self.timeout, run)?;

        run.enter(Stage::Validating);
        let cleaned = validate::validate(raw, run);

        run.enter(Stage::Loading);
        let report = load::load(self.sink.as_mut(), cleaned, limits.batch_size, run);
        tracing::debug!(
            batches = report.batches,
            failed_batches = report.failed_batches,
            submitted = report.submitted,
            "Load finished"
        );
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Check source reachability and sink connectivity without loading anything.
pub fn check_pipeline(config: &PipelineConfig) -> CheckResult {
    let source = HttpSourceClient::from_config(&config.source);
    let source_validation = match source.get(&config.source.url, config.source.timeout()) {
        Ok(page) => ValidationResult::success(format!(
            "Fetched {} records from {}{}",
            page.records.len(),
            config.source.url,
            if page.next_url.is_some() { " (more pages available)" } else { "" }
        )),
        Err(err) => ValidationResult::failed(err.to_string()),
    };

    let sink_validation = match MongoSink::connect(&config.sink) {
        Ok(sink) => ValidationResult::success(format!("Connected to {}", sink.destination())),
        Err(err) => ValidationResult::failed(err.to_string()),
    };

    CheckResult {
        source_validation,
        sink_validation,
    }
}
