use std::path::Path;

use serde_json::Value;

use crate::ipc::types::AppState;
use crate::store::Document;

/// Trimmed, non-empty string param; None covers missing, wrong type and "".
pub fn param_str(params: &Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Workspace path and document together, or None when no workspace is open.
pub fn open_parts(state: &mut AppState) -> Option<(&Path, &mut Document)> {
    match (state.workspace.as_deref(), state.doc.as_mut()) {
        (Some(workspace), Some(doc)) => Some((workspace, doc)),
        _ => None,
    }
}
