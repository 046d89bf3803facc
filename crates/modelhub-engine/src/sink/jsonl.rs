//! Newline-delimited JSON sink, used for dry runs.

use std::io::Write;

use crate::error::PipelineError;
use crate::record::CleanRecord;
use crate::sink::{InsertReport, SinkClient};

pub struct JsonLinesSink<W: Write> {
    writer: W,
    destination: String,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, destination: impl Into<String>) -> Self {
        Self {
            writer,
            destination: destination.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SinkClient for JsonLinesSink<W> {
    fn destination(&self) -> &str {
        &self.destination
    }

    fn bulk_insert(&mut self, records: Vec<CleanRecord>) -> Result<InsertReport, PipelineError> {
        let attempted = records.len();
        let mut failed = 0;
        for record in &records {
            let line = match serde_json::to_string(record) {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!(model_id = %record.model_id, error = %err, "Skipping unencodable record");
                    failed += 1;
                    continue;
                }
            };
            writeln!(self.writer, "{line}").map_err(|err| {
                PipelineError::sink(&self.destination, format!("write failed: {err}"))
            })?;
        }
        self.writer
            .flush()
            .map_err(|err| PipelineError::sink(&self.destination, format!("flush failed: {err}")))?;
        Ok(InsertReport {
            attempted,
            inserted: attempted - failed,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn record(id: &str) -> CleanRecord {
        CleanRecord {
            model_id: id.to_string(),
            license: Some("mit".to_string()),
            pipeline_tag: None,
            evaluation: None,
            memory_requirements: None,
            parsed_date: "2024-05-01".to_string(),
            parsed_datetime: "2024-05-01T10:00:00.000000".to_string(),
            created_at: None,
            downloads: Some(3),
            likes: None,
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_one_line_per_record() {
        let mut sink = JsonLinesSink::new(Vec::new(), "stdout");
        let report = sink.bulk_insert(vec![record("a"), record("b")]).unwrap();
        assert_eq!(report, InsertReport::all_inserted(2));

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["modelId"], "a");
        assert_eq!(first["downloads"], 3);
        assert!(first.get("likes").is_none());
    }

    #[test]
    fn writer_failure_is_a_sink_error() {
        let mut sink = JsonLinesSink::new(BrokenPipe, "stdout");
        let err = sink.bulk_insert(vec![record("a")]).unwrap_err();
        assert!(matches!(err, PipelineError::Sink { .. }));
        assert!(err.to_string().contains("stdout"));
    }
}
