use crate::ingest::{self, IngestOptions};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{open_parts, param_str};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::json;
use std::path::Path;

/// Run the ingestion pipeline over one roster file and merge the batch into
/// the store. The caller sees either an ingested count or a single failure;
/// row-level rejections stay internal by policy.
fn handle_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(path) = param_str(&req.params, "path") else {
        return err(&req.id, "bad_params", "missing path", None);
    };
    let Some((workspace, doc)) = open_parts(state) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let registry = store::class_names(doc);
    let batch = match ingest::ingest_roster(Path::new(&path), &registry, &IngestOptions::default())
    {
        Ok(batch) => batch,
        Err(e) => return err(&req.id, "malformed_file", e.to_string(), None),
    };

    // Nothing touches disk until the whole batch has assembled and merged.
    let summary = store::merge_students(doc, batch);
    if let Err(e) = store::save_store(workspace, doc) {
        return err(&req.id, "store_save_failed", format!("{e:?}"), None);
    }

    ok(&req.id, json!({ "ingested": summary.added }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.import" => Some(handle_import(state, req)),
        _ => None,
    }
}
