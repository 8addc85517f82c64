//! HTTP request handlers for the mock server.

pub mod collection;
pub mod entry;

pub use collection::*;
pub use entry::*;

use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::{MockError, MockState};

pub(crate) type SharedState = Arc<RwLock<MockState>>;

const SERIAL: &str = "FGVMMOCK00000000";
const VERSION: &str = "v7.4.3";
const BUILD: u32 = 2573;

/// Query parameters understood by the CMDB handlers.
///
/// Parsed by hand rather than through `Query` because `filter` repeats.
#[derive(Debug, Default)]
pub struct CmdbParams {
    pub action: Option<String>,
    pub vdom: Option<String>,
    pub filters: Vec<String>,
    pub format: Vec<String>,
    pub start: usize,
    pub count: Option<usize>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub nkey: Option<String>,
}

impl CmdbParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "action" => params.action = Some(value),
                "vdom" => params.vdom = Some(value),
                "filter" => params.filters.push(value),
                "format" => params.format = value.split('|').map(str::to_string).collect(),
                "start" => params.start = value.parse().unwrap_or(0),
                "count" => params.count = value.parse().ok(),
                "before" => params.before = Some(value),
                "after" => params.after = Some(value),
                "nkey" => params.nkey = Some(value),
                _ => {}
            }
        }
        params
    }

    fn vdom(&self) -> &str {
        self.vdom.as_deref().unwrap_or("root")
    }
}

/// Where a request was sent, echoed back in every envelope.
pub(crate) struct Target<'a> {
    pub method: &'static str,
    pub category: &'a str,
    pub object: &'a str,
    pub params: &'a CmdbParams,
}

impl Target<'_> {
    pub fn path(&self) -> String {
        format!("{}/{}", self.category, self.object)
    }

    fn base(&self, status: &str, http_status: u16) -> Map<String, Value> {
        let envelope = json!({
            "http_method": self.method,
            "vdom": self.params.vdom(),
            "path": self.category,
            "name": self.object,
            "status": status,
            "http_status": http_status,
            "serial": SERIAL,
            "version": VERSION,
            "build": BUILD
        });
        match envelope {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// A success envelope with extra top-level fields.
    pub fn success(&self, extra: Value) -> Response {
        let mut envelope = self.base("success", 200);
        if let Value::Object(extra) = extra {
            envelope.extend(extra);
        }
        (StatusCode::OK, Json(Value::Object(envelope))).into_response()
    }

    /// An error envelope for a refused change or lookup.
    pub fn error(&self, err: MockError) -> Response {
        let status = err.http_status();
        let mut envelope = self.base("error", status);
        if let Some(code) = err.code() {
            envelope.insert("error".to_string(), json!(code));
        }
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(Value::Object(envelope)),
        )
            .into_response()
    }
}

/// Reject requests without the configured bearer token.
pub(crate) fn authorize(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    let required = state.required_token.as_deref()?;
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(required) {
        None
    } else {
        Some(StatusCode::UNAUTHORIZED.into_response())
    }
}

/// Keep only the requested fields (plus the primary key).
pub(crate) fn project(entry: &Map<String, Value>, format: &[String], mkey: &str) -> Value {
    if format.is_empty() {
        return Value::Object(entry.clone());
    }
    Value::Object(
        entry
            .iter()
            .filter(|(field, _)| field.as_str() == mkey || format.contains(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_parse_repeated_filters() {
        let params = CmdbParams::parse(Some(
            "vdom=lab&filter=name%3D%40web&filter=type%3D%3Dipmask&format=name%7Csubnet&start=2&count=10",
        ));
        assert_eq!(params.vdom(), "lab");
        assert_eq!(params.filters, vec!["name=@web", "type==ipmask"]);
        assert_eq!(params.format, vec!["name", "subnet"]);
        assert_eq!(params.start, 2);
        assert_eq!(params.count, Some(10));
    }

    #[test]
    fn test_params_default_vdom() {
        let params = CmdbParams::parse(None);
        assert_eq!(params.vdom(), "root");
        assert!(params.filters.is_empty());
    }
}
