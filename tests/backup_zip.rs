#[path = "../src/store.rs"]
#[allow(dead_code)]
mod store;

#[path = "../src/backup.rs"]
#[allow(dead_code)]
mod backup;

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

#[test]
fn zip_export_and_import_roundtrip() {
    let workspace = temp_dir("kokud-backup-src");
    let workspace2 = temp_dir("kokud-backup-dst");
    let out_dir = temp_dir("kokud-backup-out");

    let doc_src = workspace.join(store::DOC_FILE);
    let bytes = br#"{"kokuData":{"students":[],"activities":[],"events":[],"sports":[]}}"#;
    std::fs::write(&doc_src, bytes).expect("write source document");

    let bundle_path = out_dir.join("workspace.kokubackup.zip");
    let export = backup::export_workspace_bundle(&workspace, &bundle_path).expect("export bundle");
    assert_eq!(export.bundle_format, backup::BUNDLE_FORMAT_V1);
    assert_eq!(export.entry_count, 3);

    let f = File::open(&bundle_path).expect("open bundle");
    let mut archive = zip::ZipArchive::new(f).expect("open zip archive");
    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    assert!(manifest.contains(backup::BUNDLE_FORMAT_V1));
    assert!(manifest.contains("documentSha256"));
    archive
        .by_name("data/koku-data.json")
        .expect("document entry in bundle");

    let import = backup::import_workspace_bundle(&bundle_path, &workspace2).expect("import bundle");
    assert_eq!(import.bundle_format_detected, backup::BUNDLE_FORMAT_V1);

    let doc_dst = workspace2.join(store::DOC_FILE);
    let restored = std::fs::read(&doc_dst).expect("read restored document");
    assert_eq!(restored, bytes);

    let _ = std::fs::remove_dir_all(workspace);
    let _ = std::fs::remove_dir_all(workspace2);
    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn bare_json_file_imports_as_legacy_document() {
    let workspace = temp_dir("kokud-backup-legacy");
    let src_dir = temp_dir("kokud-backup-legacy-src");

    let legacy = src_dir.join("export.json");
    let bytes = br#"{"kokuData":{"students":[]}}"#;
    std::fs::write(&legacy, bytes).expect("write legacy export");

    let import = backup::import_workspace_bundle(&legacy, &workspace).expect("import legacy");
    assert_eq!(import.bundle_format_detected, "legacy-json");

    let restored = std::fs::read(workspace.join(store::DOC_FILE)).expect("read restored document");
    assert_eq!(restored, bytes);

    let _ = std::fs::remove_dir_all(workspace);
    let _ = std::fs::remove_dir_all(src_dir);
}

#[test]
fn export_without_a_document_fails() {
    let workspace = temp_dir("kokud-backup-empty");
    let out_dir = temp_dir("kokud-backup-empty-out");

    let err = backup::export_workspace_bundle(&workspace, &out_dir.join("bundle.zip"))
        .expect_err("no document to export");
    assert!(err.to_string().contains("workspace document not found"));

    let _ = std::fs::remove_dir_all(workspace);
    let _ = std::fs::remove_dir_all(out_dir);
}
