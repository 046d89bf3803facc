//! HTTP source client backed by a blocking `ureq` agent.
//!
//! The upstream API returns a JSON array per page and advertises the next
//! page through an RFC 8288 `Link` header (`<url>; rel="next"`).

use std::time::Duration;

use serde_json::Value;

use crate::config::types::SourceConfig;
use crate::error::PipelineError;
use crate::record::RawRecord;
use crate::source::{Page, SourceClient};

const USER_AGENT: &str = concat!("modelhub/", env!("CARGO_PKG_VERSION"));

/// One agent per client; its connection pool is shared by every page request.
pub struct HttpSourceClient {
    agent: ureq::Agent,
    token: Option<String>,
}

impl HttpSourceClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.token.clone())
    }
}

impl SourceClient for HttpSourceClient {
    fn get(&self, url: &str, timeout: Duration) -> Result<Page, PipelineError> {
        let mut request = self
            .agent
            .get(url)
            .config()
            .timeout_global(Some(timeout))
            .build()
            .header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .call()
            .map_err(|err| PipelineError::network(url, format!("request failed: {err}")))?;

        let next_url = response
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .and_then(next_link);

        let body = response.into_body().read_to_string().map_err(|err| {
            PipelineError::network(url, format!("failed reading response body: {err}"))
        })?;

        let records = parse_page_body(url, &body)?;
        Ok(Page { records, next_url })
    }
}

/// Parse a page body into raw records. The body must be a JSON array.
pub fn parse_page_body(url: &str, body: &str) -> Result<Vec<RawRecord>, PipelineError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|err| PipelineError::network(url, format!("failed parsing response: {err}")))?;
    match json {
        Value::Array(records) => Ok(records),
        other => Err(PipelineError::network(
            url,
            format!("expected a JSON array of records, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extract the `rel="next"` target from a `Link` header value.
pub fn next_link(header: &str) -> Option<String> {
    let mut rest = header;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let close = after.find('>')?;
        let target = after[..close].trim();
        let tail = &after[close + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());
        if tail[..params_end].split(';').any(is_next_rel) && !target.is_empty() {
            return Some(target.to_string());
        }
        rest = &tail[params_end..];
    }
    None
}

fn is_next_rel(param: &str) -> bool {
    let Some((key, value)) = param.split_once('=') else {
        return false;
    };
    key.trim().eq_ignore_ascii_case("rel")
        && value
            .trim_matches(|c: char| c == '"' || c == ',' || c.is_whitespace())
            .split_whitespace()
            .any(|rel| rel.eq_ignore_ascii_case("next"))
}
