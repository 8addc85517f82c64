//! The FortiOS response envelope.
//!
//! Every CMDB call answers with the same wrapper, e.g.:
//!
//! ```json
//! {
//!   "http_method": "GET", "revision": "1e6b...", "results": [ ... ],
//!   "vdom": "root", "path": "firewall", "name": "address",
//!   "status": "success", "http_status": 200,
//!   "serial": "FGVM01TM00000000", "version": "v7.4.3", "build": 2573
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FortiError, Result};

/// Returns true if a raw envelope reports success.
///
/// `status == "success"` wins; without a `status` field a 2xx `http_status`
/// counts as success.
pub fn is_success(envelope: &Value) -> bool {
    match envelope.get("status").and_then(Value::as_str) {
        Some(status) => status.eq_ignore_ascii_case("success"),
        None => envelope
            .get("http_status")
            .and_then(Value::as_u64)
            .is_some_and(|code| (200..300).contains(&code)),
    }
}

/// A decoded CMDB response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmdbResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    /// `success` or `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,

    /// Entries for reads, the schema object for `action=schema`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub results: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,

    /// Category part of the endpoint (e.g. `firewall`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Object part of the endpoint (e.g. `address`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Primary key of the entry a write touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mkey: Option<Value>,

    /// Configuration revision after the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Whether the call changed the configuration revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_changed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_revision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<u64>,

    /// Entries matching the filter, across all pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_count: Option<u64>,

    /// Index to request for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_idx: Option<u64>,

    /// FortiOS error code on failure (e.g. `-3` entry not found).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_error: Option<String>,

    /// Anything else the device sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CmdbResponse {
    /// Returns true if the device reported success.
    pub fn is_success(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => status.eq_ignore_ascii_case("success"),
            None => self
                .http_status
                .is_some_and(|code| (200..300).contains(&code)),
        }
    }

    /// The returned entries as a list.
    ///
    /// A single object is returned as a one-element list; `null` as empty.
    pub fn results_vec(&self) -> Vec<Value> {
        match &self.results {
            Value::Array(items) => items.clone(),
            Value::Null => Vec::new(),
            other => vec![other.clone()],
        }
    }

    /// Number of returned entries.
    pub fn result_count(&self) -> usize {
        match &self.results {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// The first returned entry, if any.
    pub fn first_result(&self) -> Option<&Value> {
        match &self.results {
            Value::Array(items) => items.first(),
            Value::Null => None,
            other => Some(other),
        }
    }

    /// Deserialize the returned entries into typed models.
    ///
    /// # Errors
    ///
    /// Returns [`FortiError::ParseError`] if an entry does not match `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        self.results_vec()
            .into_iter()
            .map(|entry| serde_json::from_value(entry).map_err(FortiError::ParseError))
            .collect()
    }

    /// Best available human-readable error description.
    pub fn error_message(&self) -> String {
        if let Some(cli_error) = self.cli_error.as_deref().filter(|s| !s.trim().is_empty()) {
            return cli_error.trim().to_string();
        }
        match (self.error, self.http_status) {
            (Some(code), _) => describe_error_code(code).map_or_else(
                || format!("error code {code}"),
                |desc| format!("{desc} (error code {code})"),
            ),
            (None, Some(status)) => format!("HTTP {status}"),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// Descriptions of the FortiOS error codes seen most often.
pub fn describe_error_code(code: i64) -> Option<&'static str> {
    let desc = match code {
        -1 => "invalid length of value",
        -2 => "index out of range",
        -3 => "entry not found",
        -4 => "maximum number of entries reached",
        -5 => "a duplicate entry already exists",
        -6 => "failed to allocate memory",
        -7 => "invalid value",
        -8 => "invalid IP address",
        -9 => "invalid IP netmask",
        -15 => "entry already exists",
        -23 => "entry is still in use",
        -37 => "permission denied",
        -56 => "empty values are not allowed",
        -61 => "invalid value",
        -651 => "invalid value for an enumerated field",
        _ => return None,
    };
    Some(desc)
}
