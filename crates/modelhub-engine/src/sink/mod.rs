//! Sink capability: best-effort unordered bulk insert of clean records.

use crate::error::PipelineError;
use crate::record::CleanRecord;

pub mod jsonl;
pub mod mongo;

pub use jsonl::JsonLinesSink;
pub use mongo::MongoSink;

/// Per-call outcome of a bulk insert that the sink was able to attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub attempted: usize,
    pub inserted: usize,
    /// Documents the sink rejected individually (duplicate key, validation).
    pub failed: usize,
}

impl InsertReport {
    pub fn all_inserted(attempted: usize) -> Self {
        Self {
            attempted,
            inserted: attempted,
            failed: 0,
        }
    }
}

/// Document store write capability consumed by the loader.
///
/// `bulk_insert` must attempt every record even when some fail
/// individually, and returns `Err` only when the call could not be
/// attempted at all (for example, the connection is gone).
pub trait SinkClient {
    /// Human-readable destination identifier, e.g. `database.collection`.
    fn destination(&self) -> &str;

    fn bulk_insert(&mut self, records: Vec<CleanRecord>) -> Result<InsertReport, PipelineError>;
}
