use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DOC_FILE: &str = "koku-data.json";

// Top-level key the host application stores everything under.
const DOC_KEY: &str = "kokuData";

pub const GENDER_PLACEHOLDER: &str = "-";
pub const HOUSE_UNASSIGNED: &str = "-";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub ic_number: String,
    pub class_name: String,
    pub gender: String,
    pub house: String,
}

/// The whole persisted document. Only `students` belongs to this sidecar;
/// the other collections are owned by the host app and round-trip untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub activities: Vec<Value>,
    #[serde(default)]
    pub events: Vec<Value>,
    #[serde(default)]
    pub sports: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSummary {
    pub added: usize,
    pub skipped: usize,
}

pub fn doc_path(workspace: &Path) -> PathBuf {
    workspace.join(DOC_FILE)
}

pub fn open_store(workspace: &Path) -> anyhow::Result<Document> {
    std::fs::create_dir_all(workspace)?;
    let path = doc_path(workspace);
    if !path.is_file() {
        return Ok(Document::default());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
    let root: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.to_string_lossy()))?;
    let inner = root
        .get(DOC_KEY)
        .cloned()
        .with_context(|| format!("{} is missing the {} key", path.to_string_lossy(), DOC_KEY))?;
    let doc: Document = serde_json::from_value(inner)
        .with_context(|| format!("{} has an unreadable {} section", path.to_string_lossy(), DOC_KEY))?;
    Ok(doc)
}

pub fn save_store(workspace: &Path, doc: &mut Document) -> anyhow::Result<()> {
    doc.updated_at = Some(Utc::now().to_rfc3339());
    let mut root = serde_json::Map::new();
    root.insert(
        DOC_KEY.to_string(),
        serde_json::to_value(&*doc).context("failed to serialize document")?,
    );
    let text = serde_json::to_string_pretty(&Value::Object(root))
        .context("failed to serialize document")?;

    let path = doc_path(workspace);
    let tmp = workspace.join(format!("{}.saving", DOC_FILE));
    std::fs::write(&tmp, text)
        .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("failed to move document to {}", path.to_string_lossy()))?;
    Ok(())
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Merge a freshly ingested batch into the document. `icNumber` is the natural
/// key: an incoming student whose IC already exists (in the store or earlier in
/// the same batch) is skipped, so repeated imports of the same roster are
/// idempotent.
pub fn merge_students(doc: &mut Document, batch: Vec<Student>) -> MergeSummary {
    let mut known: HashSet<String> = doc
        .students
        .iter()
        .map(|s| digits_only(&s.ic_number))
        .collect();

    let mut summary = MergeSummary::default();
    for student in batch {
        let key = digits_only(&student.ic_number);
        if known.contains(&key) {
            summary.skipped += 1;
            continue;
        }
        known.insert(key);
        doc.students.push(student);
        summary.added += 1;
    }
    summary
}

/// Distinct class names in first-seen order. This is the live class registry
/// the resolver matches against; it is never stored separately.
pub fn class_names(doc: &Document) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    for s in &doc.students {
        let name = s.class_name.trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_string()) {
            out.push(name.to_string());
        }
    }
    out
}

pub fn rename_class(doc: &mut Document, from: &str, to: &str) -> usize {
    let mut changed = 0;
    for s in doc.students.iter_mut() {
        if s.class_name == from {
            s.class_name = to.to_string();
            changed += 1;
        }
    }
    changed
}

/// Deleting a class keeps the student records but detaches them from the
/// class; they show up as unassigned until re-imported or edited.
pub fn delete_class(doc: &mut Document, name: &str) -> usize {
    let mut cleared = 0;
    for s in doc.students.iter_mut() {
        if s.class_name == name {
            s.class_name = String::new();
            cleared += 1;
        }
    }
    cleared
}

pub fn remove_student(doc: &mut Document, id: &str) -> bool {
    let before = doc.students.len();
    doc.students.retain(|s| s.id != id);
    doc.students.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(ic: &str, class: &str) -> Student {
        Student {
            id: format!("id-{ic}"),
            name: "AHMAD BIN ALI".to_string(),
            ic_number: ic.to_string(),
            class_name: class.to_string(),
            gender: GENDER_PLACEHOLDER.to_string(),
            house: HOUSE_UNASSIGNED.to_string(),
        }
    }

    #[test]
    fn merge_skips_known_ic_and_counts_new_ones() {
        let mut doc = Document::default();
        let first = merge_students(&mut doc, vec![student("150101011234", "TAHUN 4 INTAN")]);
        assert_eq!(first.added, 1);
        assert_eq!(first.skipped, 0);

        let second = merge_students(
            &mut doc,
            vec![
                student("150101011234", "TAHUN 4 INTAN"),
                student("140202021234", "TAHUN 5 NILAM"),
            ],
        );
        assert_eq!(second.added, 1);
        assert_eq!(second.skipped, 1);
        assert_eq!(doc.students.len(), 2);
    }

    #[test]
    fn merge_dedupes_within_one_batch() {
        let mut doc = Document::default();
        let summary = merge_students(
            &mut doc,
            vec![
                student("150101011234", "TAHUN 4 INTAN"),
                student("150101011234", "TAHUN 4 INTAN"),
            ],
        );
        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(doc.students.len(), 1);
    }

    #[test]
    fn class_names_are_distinct_in_first_seen_order() {
        let mut doc = Document::default();
        doc.students.push(student("150101011111", "TAHUN 4 INTAN"));
        doc.students.push(student("150101012222", "TAHUN 5 NILAM"));
        doc.students.push(student("150101013333", "TAHUN 4 INTAN"));
        doc.students.push(student("150101014444", ""));
        assert_eq!(class_names(&doc), vec!["TAHUN 4 INTAN", "TAHUN 5 NILAM"]);
    }

    #[test]
    fn delete_class_clears_membership_but_keeps_students() {
        let mut doc = Document::default();
        doc.students.push(student("150101011111", "TAHUN 4 INTAN"));
        doc.students.push(student("150101012222", "TAHUN 5 NILAM"));
        let cleared = delete_class(&mut doc, "TAHUN 4 INTAN");
        assert_eq!(cleared, 1);
        assert_eq!(doc.students.len(), 2);
        assert_eq!(doc.students[0].class_name, "");
    }
}
