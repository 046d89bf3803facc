use anyhow::Result;

use modelhub_engine::{check_pipeline, PipelineConfig, ValidationResult, ValidationStatus};

/// Execute the `check` command: report source reachability and sink connectivity.
pub fn execute(config: &PipelineConfig) -> Result<()> {
    println!("Pipeline structure: OK");

    let result = check_pipeline(config);
    print_validation("Source", &result.source_validation);
    print_validation("Sink", &result.sink_validation);

    if result.all_ok() {
        println!("\nAll checks passed.");
        Ok(())
    } else {
        anyhow::bail!("One or more checks failed")
    }
}

fn print_validation(label: &str, result: &ValidationResult) {
    let status = match result.status {
        ValidationStatus::Success => "OK",
        ValidationStatus::Failed => "FAILED",
    };
    println!("{:19} {}", format!("{label}:"), status);
    if !result.message.is_empty() {
        println!("  {}", result.message);
    }
}
