
use serde_json::json;
use test_support::{request, request_ok, spawn_sidecar};

#[test]
fn health_reports_version_and_no_workspace() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(
        result.get("version").and_then(|v| v.as_str()),
        Some(env!("CARGO_PKG_VERSION"))
    );
    assert!(result
        .get("workspacePath")
        .map(|v| v.is_null())
        .unwrap_or(false));
}

#[test]
fn unknown_method_is_not_implemented() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(&mut stdin, &mut reader, "1", "does.notExist", json!({}));
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.pointer("/error/code").and_then(|v| v.as_str()),
        Some("not_implemented")
    );
}
