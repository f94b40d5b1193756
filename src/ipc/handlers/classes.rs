use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{open_parts, param_str};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(doc) = state.doc.as_ref() else {
        return ok(&req.id, json!({ "classes": [] }));
    };

    let classes: Vec<serde_json::Value> = store::class_names(doc)
        .into_iter()
        .map(|name| {
            let count = doc.students.iter().filter(|s| s.class_name == name).count();
            json!({ "name": name, "studentCount": count })
        })
        .collect();
    ok(&req.id, json!({ "classes": classes }))
}

fn handle_rename(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(from) = param_str(&req.params, "from") else {
        return err(&req.id, "bad_params", "missing from", None);
    };
    let Some(to) = param_str(&req.params, "to") else {
        return err(&req.id, "bad_params", "missing to", None);
    };
    let Some((workspace, doc)) = open_parts(state) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let renamed = store::rename_class(doc, &from, &to);
    if let Err(e) = store::save_store(workspace, doc) {
        return err(&req.id, "store_save_failed", format!("{e:?}"), None);
    }
    ok(&req.id, json!({ "renamed": renamed }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = param_str(&req.params, "name") else {
        return err(&req.id, "bad_params", "missing name", None);
    };
    let Some((workspace, doc)) = open_parts(state) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let cleared = store::delete_class(doc, &name);
    if let Err(e) = store::save_store(workspace, doc) {
        return err(&req.id, "store_save_failed", format!("{e:?}"), None);
    }
    ok(&req.id, json!({ "cleared": cleared }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_list(state, req)),
        "classes.rename" => Some(handle_rename(state, req)),
        "classes.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
