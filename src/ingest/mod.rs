mod metadata;
mod resolve;
mod row;
mod workbook;

pub use workbook::MalformedFileError;

use crate::store::{Student, GENDER_PLACEHOLDER, HOUSE_UNASSIGNED};
use std::path::Path;
use uuid::Uuid;

/// School-specific knobs for the pipeline. The IC-prefix table ties absolute
/// birth-year digits to a relative year level, so it shifts every academic
/// year and must stay configurable rather than hard-coded.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub ic_prefix_years: Vec<(String, String)>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            ic_prefix_years: vec![
                ("15".to_string(), "4".to_string()),
                ("14".to_string(), "5".to_string()),
                ("13".to_string(), "6".to_string()),
            ],
        }
    }
}

/// Run the whole pipeline over one roster file: read rows, work out the
/// sheet-level year/class, normalize each row, resolve the class once against
/// the live registry, and assemble one Student per accepted row.
///
/// Rows that fail the acceptance test are dropped without diagnostics; only a
/// file that cannot be parsed at all fails the call. Deduplication against the
/// store is the caller's job (`store::merge_students`), not this function's.
pub fn ingest_roster(
    path: &Path,
    registry: &[String],
    options: &IngestOptions,
) -> Result<Vec<Student>, MalformedFileError> {
    let rows = workbook::read_rows(path)?;

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut meta = metadata::extract_sheet_meta(&file_name, &rows);

    let mut candidates: Vec<row::RowCandidate> = Vec::new();
    for cells in &rows {
        if let Some(candidate) = row::normalize_row(cells) {
            candidates.push(candidate);
        }
    }

    // Last-resort year: infer it from the first IC whose prefix we recognize.
    // Never overrides an explicit sheet-level year.
    if meta.year.is_empty() {
        for candidate in &candidates {
            if let Some(year) = row::year_from_ic(&candidate.ic, &options.ic_prefix_years) {
                meta.year = year;
                break;
            }
        }
    }

    let class_name = resolve::resolve_class(&meta.year, &meta.label, registry);

    Ok(candidates
        .into_iter()
        .map(|c| Student {
            id: Uuid::new_v4().to_string(),
            name: c.name,
            ic_number: c.ic,
            class_name: class_name.clone(),
            gender: GENDER_PLACEHOLDER.to_string(),
            house: HOUSE_UNASSIGNED.to_string(),
        })
        .collect())
}
