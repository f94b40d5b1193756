use calamine::{open_workbook_auto, Data, Reader};
use std::fmt;
use std::path::Path;

/// The one caller-visible failure of the ingestion pipeline: the file could
/// not be opened or parsed as a supported roster spreadsheet. Everything
/// below file level is absorbed by the normalizer's silent-skip policy.
#[derive(Debug)]
pub struct MalformedFileError {
    path: String,
    reason: String,
}

impl MalformedFileError {
    pub fn new(path: &Path, reason: impl Into<String>) -> Self {
        MalformedFileError {
            path: path.to_string_lossy().to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MalformedFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot read {} as a roster file: {}", self.path, self.reason)
    }
}

impl std::error::Error for MalformedFileError {}

/// Read the first sheet of a roster file as rows of cell text. Blank cells
/// become empty strings; numeric cells are rendered without grouping so long
/// digit strings survive intact.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, MalformedFileError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" => read_workbook_rows(path),
        "csv" => read_csv_rows(path),
        other => Err(MalformedFileError::new(
            path,
            format!("unsupported extension: {:?}", other),
        )),
    }
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<String>>, MalformedFileError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| MalformedFileError::new(path, e.to_string()))?;

    // First-sheet convention: the roster exports put everything on sheet 1.
    let names = workbook.sheet_names().to_owned();
    let Some(first) = names.first().cloned() else {
        return Ok(Vec::new());
    };

    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| MalformedFileError::new(path, e.to_string()))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in range.rows() {
        rows.push(row.iter().map(cell_to_string).collect());
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, MalformedFileError> {
    let bytes = std::fs::read(path).map_err(|e| MalformedFileError::new(path, e.to_string()))?;
    let text = String::from_utf8_lossy(&bytes);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_csv_record(line));
    }
    Ok(rows)
}

fn parse_csv_record(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                buf.push('"');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            i += 1;
            continue;
        }
        if ch == ',' && !in_quotes {
            out.push(buf.trim().to_string());
            buf = String::new();
            i += 1;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    out.push(buf.trim().to_string());
    out
}
