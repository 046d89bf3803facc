use anyhow::{Context, Result};

use modelhub_engine::{ExecutionOptions, Pipeline, PipelineConfig, RunSummary};

/// Execute the `run` command: build the pipeline and run it once.
///
/// A run that hit errors still exits successfully; the summary reports them.
pub fn execute(config: &PipelineConfig, dry_run: bool) -> Result<()> {
    let limits = config.run.limits()?;
    tracing::info!(
        pipeline = config.pipeline,
        source = config.source.url,
        database = config.sink.database,
        collection = config.sink.collection,
        dry_run,
        "Pipeline validated"
    );

    let options = ExecutionOptions { dry_run };
    let mut pipeline =
        Pipeline::from_config(config, &options).context("Failed to initialize pipeline")?;
    let summary = pipeline.run(limits);

    // Dry runs own stdout for the records themselves.
    let report = render_summary(&config.pipeline, &summary);
    if dry_run {
        eprint!("{report}");
    } else {
        print!("{report}");
    }

    Ok(())
}

fn render_summary(pipeline: &str, summary: &RunSummary) -> String {
    let mut out = match summary.failed_stage {
        None => format!("Pipeline '{pipeline}' completed.\n"),
        Some(stage) => format!("Pipeline '{pipeline}' stopped during {stage}.\n"),
    };
    out.push_str(&format!("  Records processed: {}\n", summary.processed));
    out.push_str(&format!("  Errors:            {}\n", summary.errors));
    out.push_str(&format!("  Extracted:         {}\n", summary.extracted));
    out.push_str(&format!("  Validated:         {}\n", summary.validated));
    out.push_str(&format!("  Batches:           {}\n", summary.batches));
    if summary.sink_rejected > 0 {
        out.push_str(&format!("  Sink rejected:     {}\n", summary.sink_rejected));
    }
    out.push_str(&format!(
        "  Duration:          {:.2}s\n",
        summary.duration.as_secs_f64()
    ));

    // Machine-readable line for scripts
    let json = serde_json::json!({
        "processed": summary.processed,
        "errors": summary.errors,
        "extracted": summary.extracted,
        "validated": summary.validated,
        "batches": summary.batches,
        "sink_rejected": summary.sink_rejected,
        "duration_secs": summary.duration.as_secs_f64(),
        "failed_stage": summary.failed_stage.map(|s| s.to_string()),
    });
    out.push_str(&format!("@@SUMMARY_JSON@@{json}\n"));
    out
}
