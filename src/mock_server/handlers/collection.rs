//! Table-level handlers: list, create, schema and defaults.

use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde_json::{json, Value};

use super::{authorize, project, CmdbParams, SharedState, Target};
use crate::mock_server::fixtures::Fixtures;
use crate::mock_server::state::MockError;

/// GET /api/v2/cmdb/{category}/{object}
pub async fn list_entries(
    State(state): State<SharedState>,
    Path((category, object)): Path<(String, String)>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Some(denied) = authorize(&state, &headers) {
        return denied;
    }

    let params = CmdbParams::parse(raw.as_deref());
    let target = Target {
        method: "GET",
        category: &category,
        object: &object,
        params: &params,
    };
    let path = target.path();

    let table = match state.table(&path) {
        Some(table) => table,
        None => return target.error(MockError::UnknownTable),
    };

    match params.action.as_deref() {
        Some("schema") => return target.success(json!({"results": Fixtures::schema(&path, &table.mkey)})),
        Some("default") => return target.success(json!({"results": Fixtures::defaults(&table.mkey)})),
        _ => {}
    }

    let matched = match state.list_entries(&path, &params.filters) {
        Ok(matched) => matched,
        Err(err) => return target.error(err),
    };
    let matched_count = matched.len();

    let results: Vec<Value> = matched
        .into_iter()
        .skip(params.start)
        .take(params.count.unwrap_or(usize::MAX))
        .map(|entry| project(entry, &params.format, &table.mkey))
        .collect();

    let mut extra = json!({
        "results": results,
        "size": results.len(),
        "matched_count": matched_count,
        "revision": state.revision.to_string()
    });
    if !results.is_empty() {
        extra["next_idx"] = json!(params.start + results.len() - 1);
    }
    target.success(extra)
}

/// POST /api/v2/cmdb/{category}/{object}
pub async fn create_entry(
    State(state): State<SharedState>,
    Path((category, object)): Path<(String, String)>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Some(denied) = authorize(&state, &headers) {
        return denied;
    }

    let params = CmdbParams::parse(raw.as_deref());
    let target = Target {
        method: "POST",
        category: &category,
        object: &object,
        params: &params,
    };

    let body = match body {
        Value::Object(body) => body,
        _ => return target.error(MockError::MissingKey),
    };

    let old_revision = state.revision;
    match state.create_entry(&target.path(), body) {
        Ok(mkey) => target.success(json!({
            "mkey": mkey,
            "revision": state.revision.to_string(),
            "revision_changed": true,
            "old_revision": old_revision.to_string()
        })),
        Err(err) => target.error(err),
    }
}
