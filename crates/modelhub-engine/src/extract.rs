//! Paginated extraction from the source API.
//!
//! Pages are fetched whole and appended in source order until the source stops
//! returning a next link or the accumulated count reaches the record budget.
//! The last page may overshoot the budget; the result is truncated afterwards,
//! so the number of source calls is the same as if no truncation happened.

use std::time::Duration;

use crate::error::PipelineError;
use crate::record::RawRecord;
use crate::result::PipelineRun;
use crate::source::SourceClient;

pub struct Extractor {
    start_url: String,
    page_delay: Duration,
}

impl Extractor {
    pub fn new(start_url: impl Into<String>, page_delay: Duration) -> Self {
        Self {
            start_url: start_url.into(),
            page_delay,
        }
    }

    /// Fetch pages until pagination ends or `budget` records are collected.
    ///
    /// Sleeps `page_delay` after every successful page.
    ///
    /// # Errors
    ///
    /// Any source failure aborts the extraction; nothing fetched so far is
    /// returned. The failure is logged and counted on `run` before it is
    /// returned to the caller.
    pub fn extract(
        &self,
        source: &dyn SourceClient,
        budget: Option<usize>,
        timeout: Duration,
        run: &mut PipelineRun,
    ) -> Result<Vec<RawRecord>, PipelineError> {
        let mut records: Vec<RawRecord> = Vec::new();
        let mut next = Some(self.start_url.clone());

        while let Some(url) = next.take() {
            if budget.is_some_and(|max| records.len() >= max) {
                break;
            }

            let page = match source.get(&url, timeout) {
                Ok(page) => page,
                Err(err) => {
                    tracing::error!(url = %url, error = %err, "Error during extraction");
                    run.record_error();
                    return Err(err);
                }
            };

            tracing::info!(url = %url, records = page.records.len(), "Extracted page");
            records.extend(page.records);
            next = page.next_url;

            if !self.page_delay.is_zero() {
                std::thread::sleep(self.page_delay);
            }
        }

        if let Some(max) = budget {
            records.truncate(max);
        }
        run.record_extracted(records.len());
        Ok(records)
    }
}
