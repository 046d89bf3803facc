//! MongoDB sink using the driver's synchronous API.

use mongodb::bson::{doc, Document};
use mongodb::error::ErrorKind;
use mongodb::sync::{Client, Collection};

use crate::config::types::SinkConfig;
use crate::error::PipelineError;
use crate::record::CleanRecord;
use crate::sink::{InsertReport, SinkClient};

pub struct MongoSink {
    collection: Collection<Document>,
    destination: String,
}

impl MongoSink {
    /// Connect and ping the target database.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Sink`] if the connection string is invalid or
    /// the server does not answer the ping.
    pub fn connect(config: &SinkConfig) -> Result<Self, PipelineError> {
        let destination = format!("{}.{}", config.database, config.collection);
        let client = Client::with_uri_str(&config.uri).map_err(|err| {
            PipelineError::sink(&destination, format!("invalid connection string: {err}"))
        })?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|err| PipelineError::sink(&destination, format!("ping failed: {err}")))?;

        tracing::info!(destination = %destination, "Connected to document store");
        Ok(Self {
            collection: database.collection::<Document>(&config.collection),
            destination,
        })
    }
}

impl SinkClient for MongoSink {
    fn destination(&self) -> &str {
        &self.destination
    }

    fn bulk_insert(&mut self, records: Vec<CleanRecord>) -> Result<InsertReport, PipelineError> {
        let attempted = records.len();
        let documents = records
            .iter()
            .map(|record| mongodb::bson::to_document(record))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                PipelineError::sink(&self.destination, format!("failed encoding batch: {err}"))
            })?;

        match self.collection.insert_many(documents).ordered(false).run() {
            Ok(_) => Ok(InsertReport::all_inserted(attempted)),
            Err(err) => match err.kind.as_ref() {
                // Unordered inserts report per-document failures after
                // attempting the whole batch.
                ErrorKind::InsertMany(failure) if failure.write_concern_error.is_none() => {
                    let failed = failure.write_errors.as_ref().map_or(0, Vec::len).min(attempted);
                    Ok(InsertReport {
                        attempted,
                        inserted: attempted - failed,
                        failed,
                    })
                }
                _ => Err(PipelineError::sink(
                    &self.destination,
                    format!("bulk insert failed: {err}"),
                )),
            },
        }
    }
}
