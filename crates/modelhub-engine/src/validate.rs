//! Record validation: drop records without an identifier, keep only the
//! recognized fields, and stamp each record with its parse time.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::error::{record_preview, PipelineError};
use crate::record::{fields, CleanRecord, RawRecord};
use crate::result::PipelineRun;

/// Validate every record independently, preserving input order.
///
/// Records without an identifier are skipped with a warning. Records that
/// cannot be reshaped are logged and counted as errors on `run`; neither case
/// stops the remaining records from being processed.
pub fn validate(records: Vec<RawRecord>, run: &mut PipelineRun) -> Vec<CleanRecord> {
    let mut cleaned = Vec::with_capacity(records.len());
    for raw in records {
        match clean_record(&raw, Local::now()) {
            Ok(Some(record)) => cleaned.push(record),
            Ok(None) => {
                tracing::warn!(record = %record_preview(&raw), "Skipping model without ID");
            }
            Err(err) => {
                tracing::error!(error = %err, "Validation error");
                run.record_error();
            }
        }
    }
    run.record_validated(cleaned.len());
    cleaned
}

/// Reshape one raw record.
///
/// Returns `Ok(None)` when the identifier is missing or empty, and an error
/// when the record is not an object or a recognized field has the wrong type.
/// `null` values are treated as absent.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] for malformed records.
pub fn clean_record(
    raw: &RawRecord,
    parsed_at: DateTime<Local>,
) -> Result<Option<CleanRecord>, PipelineError> {
    let Some(obj) = raw.as_object() else {
        return Err(PipelineError::validation("record is not a JSON object", raw));
    };

    let model_id = match obj.get(fields::MODEL_ID) {
        Some(value) if is_truthy(value) => value.as_str().ok_or_else(|| {
            PipelineError::validation(format!("{} must be a string", fields::MODEL_ID), raw)
        })?,
        _ => return Ok(None),
    };

    Ok(Some(CleanRecord {
        model_id: model_id.to_string(),
        license: optional_string(obj, fields::LICENSE, raw)?,
        pipeline_tag: optional_string(obj, fields::PIPELINE_TAG, raw)?,
        evaluation: optional_value(obj, fields::EVALUATION),
        memory_requirements: optional_value(obj, fields::MEMORY_REQUIREMENTS),
        parsed_date: parsed_at.format("%Y-%m-%d").to_string(),
        parsed_datetime: parsed_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        created_at: optional_string(obj, fields::CREATED_AT, raw)?,
        downloads: optional_integer(obj, fields::DOWNLOADS, raw)?,
        likes: optional_integer(obj, fields::LIKES, raw)?,
    }))
}

/// Empty strings, `false`, zero, and empty containers count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn optional_value(obj: &Map<String, Value>, key: &str) -> Option<Value> {
    obj.get(key).filter(|v| !v.is_null()).cloned()
}

fn optional_string(
    obj: &Map<String, Value>,
    key: &str,
    raw: &RawRecord,
) -> Result<Option<String>, PipelineError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(PipelineError::validation(format!("{key} must be a string"), raw)),
    }
}

fn optional_integer(
    obj: &Map<String, Value>,
    key: &str,
    raw: &RawRecord,
) -> Result<Option<i64>, PipelineError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| PipelineError::validation(format!("{key} must be an integer"), raw)),
    }
}
