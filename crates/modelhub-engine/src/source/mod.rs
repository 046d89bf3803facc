//! Source capability: fetch one page of raw records from a URL.

use std::time::Duration;

use crate::error::PipelineError;
use crate::record::RawRecord;

pub mod http;

pub use http::HttpSourceClient;

/// One page returned by the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<RawRecord>,
    /// URL of the following page; `None` ends pagination.
    pub next_url: Option<String>,
}

/// Blocking page fetcher consumed by the extractor.
///
/// Implementations fail with [`PipelineError::Network`] on timeout,
/// connection failure, non-2xx status or an unreadable body.
pub trait SourceClient {
    fn get(&self, url: &str, timeout: Duration) -> Result<Page, PipelineError>;
}
