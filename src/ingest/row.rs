/// One spreadsheet row boiled down to the two things a roster row must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCandidate {
    pub name: String,
    pub ic: String,
}

// Header cells that must never be mistaken for a student name.
const NAME_STOPLIST: &[&str] = &["BIL", "NAMA", "IC", "KELAS"];

const MIN_IC_DIGITS: usize = 10;

/// Extract a name and IC number from one raw row, or drop the row silently.
/// Header rows, blank rows and merged-cell artifacts are expected to fail
/// here; that is policy, not an error.
pub fn normalize_row(cells: &[String]) -> Option<RowCandidate> {
    let ic = extract_ic(cells)?;
    if ic.len() < MIN_IC_DIGITS {
        return None;
    }
    let name = extract_name(cells)?;
    Some(RowCandidate { name, ic })
}

/// Sheet-level year fallback: the first two IC digits encode the birth year,
/// which this school maps onto a year level for the current intake. The table
/// is supplied by the caller because it shifts every academic year.
pub fn year_from_ic(ic: &str, prefix_years: &[(String, String)]) -> Option<String> {
    let prefix = ic.get(0..2)?;
    prefix_years
        .iter()
        .find(|(p, _)| p == prefix)
        .map(|(_, y)| y.clone())
}

fn extract_ic(cells: &[String]) -> Option<String> {
    for cell in cells {
        let text = if cell.contains("E+") {
            recover_scientific(cell)
        } else {
            cell.clone()
        };
        if let Some(ic) = find_ic(&text) {
            return Some(ic);
        }
    }
    None
}

/// Spreadsheet tools auto-format long digit strings as floats ("1.5E+11").
/// Parse the value back and render it as a plain integer string so the IC
/// matcher sees the digits again.
fn recover_scientific(text: &str) -> String {
    match text.trim().parse::<f64>() {
        Ok(v) => format!("{:.0}", v),
        Err(_) => text.to_string(),
    }
}

/// First match of either 12 consecutive digits or NNNNNN-NN-NNNN, scanning
/// left to right; dashes stripped from the result.
fn find_ic(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len() {
        if !bytes[start].is_ascii_digit() {
            continue;
        }
        if let Some(ic) = match_plain(bytes, start) {
            return Some(ic);
        }
        if let Some(ic) = match_dashed(bytes, start) {
            return Some(ic);
        }
    }
    None
}

fn match_plain(bytes: &[u8], start: usize) -> Option<String> {
    if start + 12 > bytes.len() {
        return None;
    }
    let run = &bytes[start..start + 12];
    if run.iter().all(|b| b.is_ascii_digit()) {
        return Some(String::from_utf8_lossy(run).to_string());
    }
    None
}

fn match_dashed(bytes: &[u8], start: usize) -> Option<String> {
    // NNNNNN-NN-NNNN
    if start + 14 > bytes.len() {
        return None;
    }
    let seg = &bytes[start..start + 14];
    let shape_ok = seg[..6].iter().all(|b| b.is_ascii_digit())
        && seg[6] == b'-'
        && seg[7..9].iter().all(|b| b.is_ascii_digit())
        && seg[9] == b'-'
        && seg[10..].iter().all(|b| b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    Some(
        seg.iter()
            .filter(|b| b.is_ascii_digit())
            .map(|b| *b as char)
            .collect(),
    )
}

fn extract_name(cells: &[String]) -> Option<String> {
    for cell in cells {
        let t = cell.trim();
        if t.len() <= 3 {
            continue;
        }
        if t.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        if t.contains(':') {
            continue;
        }
        let up = t.to_uppercase();
        if NAME_STOPLIST.iter().any(|s| *s == up) {
            continue;
        }
        return Some(up);
    }
    None
}
