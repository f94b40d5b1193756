use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{open_parts, param_str};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, Student, GENDER_PLACEHOLDER, HOUSE_UNASSIGNED};
use serde_json::json;
use uuid::Uuid;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(doc) = state.doc.as_ref() else {
        return ok(&req.id, json!({ "students": [] }));
    };
    ok(&req.id, json!({ "students": doc.students }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = param_str(&req.params, "name") else {
        return err(&req.id, "bad_params", "missing name", None);
    };
    let Some(ic_raw) = param_str(&req.params, "icNumber") else {
        return err(&req.id, "bad_params", "missing icNumber", None);
    };
    let ic = store::digits_only(&ic_raw);
    if ic.len() < 10 {
        return err(
            &req.id,
            "bad_params",
            "icNumber must contain at least 10 digits",
            None,
        );
    }

    let class_name = param_str(&req.params, "className").unwrap_or_default();
    let gender =
        param_str(&req.params, "gender").unwrap_or_else(|| GENDER_PLACEHOLDER.to_string());
    let house = param_str(&req.params, "house").unwrap_or_else(|| HOUSE_UNASSIGNED.to_string());

    let Some((workspace, doc)) = open_parts(state) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    if doc
        .students
        .iter()
        .any(|s| store::digits_only(&s.ic_number) == ic)
    {
        return err(
            &req.id,
            "duplicate_ic",
            "a student with this icNumber already exists",
            None,
        );
    }

    let student = Student {
        id: Uuid::new_v4().to_string(),
        name: name.to_uppercase(),
        ic_number: ic,
        class_name,
        gender,
        house,
    };
    let student_id = student.id.clone();
    doc.students.push(student);

    if let Err(e) = store::save_store(workspace, doc) {
        return err(&req.id, "store_save_failed", format!("{e:?}"), None);
    }
    ok(&req.id, json!({ "studentId": student_id }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student_id) = param_str(&req.params, "studentId") else {
        return err(&req.id, "bad_params", "missing studentId", None);
    };
    let Some((workspace, doc)) = open_parts(state) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    if !store::remove_student(doc, &student_id) {
        return err(&req.id, "not_found", "no such student", None);
    }
    if let Err(e) = store::save_store(workspace, doc) {
        return err(&req.id, "store_save_failed", format!("{e:?}"), None);
    }
    ok(&req.id, json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
