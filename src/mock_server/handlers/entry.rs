//! Entry-level handlers: read, update, move, clone and delete.

use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde_json::{json, Value};

use super::{authorize, project, CmdbParams, SharedState, Target};
use crate::mock_server::state::MockError;

/// GET /api/v2/cmdb/{category}/{object}/{mkey}
pub async fn get_entry(
    State(state): State<SharedState>,
    Path((category, object, mkey)): Path<(String, String, String)>,
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

    match state.get_entry(&path, &mkey) {
        Ok(entry) => {
            let key_field = state.table(&path).map(|t| t.mkey.as_str()).unwrap_or("name");
            target.success(json!({
                "results": [project(entry, &params.format, key_field)],
                "size": 1,
                "matched_count": 1,
                "revision": state.revision.to_string()
            }))
        }
        Err(err) => target.error(err),
    }
}

/// PUT /api/v2/cmdb/{category}/{object}/{mkey}
///
/// With `action=move` the body is ignored and the entry is repositioned
/// relative to `before` or `after`.
pub async fn update_entry(
    State(state): State<SharedState>,
    Path((category, object, mkey)): Path<(String, String, String)>,
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
        method: "PUT",
        category: &category,
        object: &object,
        params: &params,
    };
    let path = target.path();
    let old_revision = state.revision;

    let result = if params.action.as_deref() == Some("move") {
        let moved = match (&params.before, &params.after) {
            (Some(anchor), _) => state.move_entry(&path, &mkey, anchor, true),
            (None, Some(anchor)) => state.move_entry(&path, &mkey, anchor, false),
            (None, None) => Err(MockError::MissingKey),
        };
        moved.map(|()| json!(mkey))
    } else {
        match body {
            Value::Object(patch) => state.update_entry(&path, &mkey, patch),
            _ => Err(MockError::MissingKey),
        }
    };

    match result {
        Ok(key) => target.success(json!({
            "mkey": key,
            "revision": state.revision.to_string(),
            "revision_changed": true,
            "old_revision": old_revision.to_string()
        })),
        Err(err) => target.error(err),
    }
}

/// POST /api/v2/cmdb/{category}/{object}/{mkey}?action=clone&nkey=...
pub async fn clone_entry(
    State(state): State<SharedState>,
    Path((category, object, mkey)): Path<(String, String, String)>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
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

    let new_key = match (params.action.as_deref(), params.nkey.as_deref()) {
        (Some("clone"), Some(nkey)) if !nkey.is_empty() => nkey,
        _ => return target.error(MockError::MissingKey),
    };

    match state.clone_entry(&target.path(), &mkey, new_key) {
        Ok(()) => target.success(json!({
            "mkey": new_key,
            "revision": state.revision.to_string()
        })),
        Err(err) => target.error(err),
    }
}

/// DELETE /api/v2/cmdb/{category}/{object}/{mkey}
pub async fn delete_entry(
    State(state): State<SharedState>,
    Path((category, object, mkey)): Path<(String, String, String)>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if let Some(denied) = authorize(&state, &headers) {
        return denied;
    }

    let params = CmdbParams::parse(raw.as_deref());
    let target = Target {
        method: "DELETE",
        category: &category,
        object: &object,
        params: &params,
    };

    match state.delete_entry(&target.path(), &mkey) {
        Ok(()) => target.success(json!({
            "mkey": mkey,
            "revision": state.revision.to_string()
        })),
        Err(err) => target.error(err),
    }
}
