//! In-memory source and sink doubles shared by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use crate::error::PipelineError;
use crate::record::{CleanRecord, RawRecord};
use crate::sink::{InsertReport, SinkClient};
use crate::source::{Page, SourceClient};

pub(crate) const START_URL: &str = "https://hub.test/api/models";

/// Source serving pre-built pages keyed by URL; unknown URLs fail.
#[derive(Default)]
pub(crate) struct FakeSource {
    pages: HashMap<String, Page>,
    failing: HashMap<String, String>,
    pub(crate) requested: RefCell<Vec<String>>,
}

impl FakeSource {
    /// Chain `pages` starting at [`START_URL`], each linking to the next.
    pub(crate) fn paged(pages: Vec<Vec<RawRecord>>) -> Self {
        let mut source = Self::default();
        let count = pages.len();
        for (idx, records) in pages.into_iter().enumerate() {
            let next_url = (idx + 1 < count).then(|| page_url(idx + 1));
            source
                .pages
                .insert(page_url(idx), Page { records, next_url });
        }
        source
    }

    pub(crate) fn fail_at(mut self, page: usize, reason: &str) -> Self {
        self.failing.insert(page_url(page), reason.to_string());
        self
    }
}

impl SourceClient for FakeSource {
    fn get(&self, url: &str, _timeout: Duration) -> Result<Page, PipelineError> {
        self.requested.borrow_mut().push(url.to_string());
        if let Some(reason) = self.failing.get(url) {
            return Err(PipelineError::network(url, reason.clone()));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| PipelineError::network(url, "404 Not Found"))
    }
}

pub(crate) fn page_url(idx: usize) -> String {
    if idx == 0 {
        START_URL.to_string()
    } else {
        format!("{START_URL}?page={idx}")
    }
}

/// Raw records `{prefix}-{n}` for `n` in `range`.
pub(crate) fn raw_models(prefix: &str, range: std::ops::Range<usize>) -> Vec<RawRecord> {
    range
        .map(|n| json!({ "modelId": format!("{prefix}-{n}"), "downloads": n }))
        .collect()
}

/// Sink recording every batch, optionally failing selected calls (0-based).
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    pub(crate) batches: Rc<RefCell<Vec<Vec<CleanRecord>>>>,
    fail_calls: Vec<usize>,
    reject_per_batch: usize,
    calls: Rc<RefCell<usize>>,
}

impl RecordingSink {
    pub(crate) fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.to_vec(),
            ..Self::default()
        }
    }

    pub(crate) fn rejecting(per_batch: usize) -> Self {
        Self {
            reject_per_batch: per_batch,
            ..Self::default()
        }
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batches.borrow().iter().map(Vec::len).collect()
    }
}

impl SinkClient for RecordingSink {
    fn destination(&self) -> &str {
        "test.models"
    }

    fn bulk_insert(&mut self, records: Vec<CleanRecord>) -> Result<InsertReport, PipelineError> {
        let call = {
            let mut calls = self.calls.borrow_mut();
            *calls += 1;
            *calls - 1
        };
        if self.fail_calls.contains(&call) {
            return Err(PipelineError::sink("test.models", "connection reset"));
        }
        let attempted = records.len();
        let failed = self.reject_per_batch.min(attempted);
        self.batches.borrow_mut().push(records);
        Ok(InsertReport {
            attempted,
            inserted: attempted - failed,
            failed,
        })
    }
}

pub(crate) fn clean(model_id: &str) -> CleanRecord {
    CleanRecord {
        model_id: model_id.to_string(),
        license: None,
        pipeline_tag: None,
        evaluation: None,
        memory_requirements: None,
        parsed_date: "2024-05-01".to_string(),
        parsed_datetime: "2024-05-01T10:00:00.000000".to_string(),
        created_at: None,
        downloads: None,
        likes: None,
    }
}
