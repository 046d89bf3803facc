//! Batched loading into the sink.

use std::num::NonZeroUsize;

use crate::record::CleanRecord;
use crate::result::PipelineRun;
use crate::sink::SinkClient;

/// Per-call totals of a [`load`] invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub batches: usize,
    pub failed_batches: usize,
    pub submitted: usize,
    pub rejected: usize,
}

/// Split `records` into contiguous batches of at most `batch_size` and submit
/// each one to the sink in order.
///
/// A batch whose submission fails is logged and counted as one error on
/// `run`; later batches are still attempted and earlier ones stay written.
/// Successfully submitted batches add their full size to the processed count,
/// even when the sink reports some documents as rejected.
pub fn load(
    sink: &mut dyn SinkClient,
    records: Vec<CleanRecord>,
    batch_size: NonZeroUsize,
    run: &mut PipelineRun,
) -> LoadReport {
    let mut report = LoadReport::default();
    let mut remaining = records.into_iter();
    let mut batch_no = 0usize;

    loop {
        let batch: Vec<CleanRecord> = remaining.by_ref().take(batch_size.get()).collect();
        if batch.is_empty() {
            break;
        }
        batch_no += 1;
        let size = batch.len();
        tracing::info!(
            batch = batch_no,
            size,
            destination = sink.destination(),
            "Inserting batch"
        );

        match sink.bulk_insert(batch) {
            Ok(outcome) => {
                if outcome.failed > 0 {
                    tracing::warn!(
                        batch = batch_no,
                        rejected = outcome.failed,
                        "Sink rejected some documents in batch"
                    );
                }
                run.record_processed(size);
                run.record_batch(outcome.failed);
                report.batches += 1;
                report.submitted += size;
                report.rejected += outcome.failed;
                tracing::info!(batch = batch_no, "Processed batch");
            }
            Err(err) => {
                tracing::error!(batch = batch_no, size, error = %err, "Error during batch insertion");
                run.record_error();
                report.failed_batches += 1;
            }
        }
    }

    report
}
