//! Raw upstream records and the cleaned subset persisted to the sink.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record as returned by the upstream API: an arbitrary JSON value that is
/// expected, but not guaranteed, to be an object with a `modelId` field.
pub type RawRecord = Value;

/// Field names recognized in raw records and written to the sink.
pub mod fields {
    pub const MODEL_ID: &str = "modelId";
    pub const LICENSE: &str = "license";
    pub const PIPELINE_TAG: &str = "pipeline_tag";
    pub const EVALUATION: &str = "evaluation";
    pub const MEMORY_REQUIREMENTS: &str = "memory_requirements";
    pub const PARSED_DATE: &str = "parsed_date";
    pub const PARSED_DATETIME: &str = "parsed_datetime";
    pub const CREATED_AT: &str = "createdAt";
    pub const DOWNLOADS: &str = "downloads";
    pub const LIKES: &str = "likes";
}

/// Validated model metadata.
///
/// Absent optional fields are omitted from the serialized form rather than
/// written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    #[serde(rename = "modelId")]
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_requirements: Option<Value>,
    /// Calendar date (`YYYY-MM-DD`) the record was validated.
    pub parsed_date: String,
    /// Local date-time the record was validated, ISO 8601 with microseconds.
    pub parsed_datetime: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
}
