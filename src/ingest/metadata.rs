/// Sheet-level context worked out once per file and reused for every row.
/// Rows rarely carry their own year/class; the information lives in the file
/// name or in a banner row near the top of the sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetMeta {
    pub year: String,
    pub label: String,
}

const ORDINAL_YEARS: &[(&str, &str)] = &[
    ("SATU", "1"),
    ("DUA", "2"),
    ("TIGA", "3"),
    ("EMPAT", "4"),
    ("LIMA", "5"),
    ("ENAM", "6"),
];

// Class names used by the school; last-resort keyword match on the file name.
const CLASS_KEYWORDS: &[&str] = &[
    "NILAM", "AKID", "INTAN", "DELIMA", "MAWAR", "ZAMRUD", "ANGGERIK",
];

const HEADER_SCAN_ROWS: usize = 15;

/// Ordered fallback, first success wins per field: file name pattern, then a
/// scan of the top rows, then a known-class keyword search on the file name.
pub fn extract_sheet_meta(file_name: &str, rows: &[Vec<String>]) -> SheetMeta {
    let mut meta = SheetMeta::default();

    if let Some((year, label)) = match_filename_pattern(file_name) {
        meta.year = year;
        meta.label = label;
        return meta;
    }

    for row in rows.iter().take(HEADER_SCAN_ROWS) {
        if !meta.year.is_empty() && !meta.label.is_empty() {
            break;
        }
        let line = row.join("|").to_uppercase();
        if meta.year.is_empty() {
            if let Some(digits) = digits_after_keyword(&line, "TAHUN") {
                meta.year = digits;
            }
        }
        if meta.label.is_empty() {
            if let Some(label) = label_after_keyword(&line, "KELAS") {
                meta.label = label;
            }
        }
    }

    if meta.label.is_empty() {
        let name_up = file_name.to_uppercase();
        for kw in CLASS_KEYWORDS {
            if name_up.contains(kw) {
                meta.label = (*kw).to_string();
                break;
            }
        }
    }

    meta
}

pub fn normalize_year_token(token: &str) -> String {
    let up = token.trim().to_uppercase();
    for (word, digit) in ORDINAL_YEARS {
        if up == *word {
            return (*digit).to_string();
        }
    }
    // Unrecognized tokens pass through unchanged; not an error.
    up
}

pub fn ordinal_for_year(year: &str) -> Option<&'static str> {
    // Only the upper years appear with ordinal spellings in practice.
    match year {
        "4" => Some("EMPAT"),
        "5" => Some("LIMA"),
        "6" => Some("ENAM"),
        _ => None,
    }
}

/// `TAHUN <digits-or-ordinal> <letters>` on the uppercased file name, with the
/// three parts whitespace-separated. A hit fills both fields at once.
fn match_filename_pattern(file_name: &str) -> Option<(String, String)> {
    let up = file_name.to_uppercase();
    let tokens: Vec<&str> = up.split_whitespace().collect();

    for i in 0..tokens.len() {
        if tokens[i] != "TAHUN" {
            continue;
        }
        let Some(year_tok) = tokens.get(i + 1) else {
            continue;
        };
        let is_digits = !year_tok.is_empty() && year_tok.chars().all(|c| c.is_ascii_digit());
        let is_ordinal = ORDINAL_YEARS.iter().any(|(w, _)| w == year_tok);
        if !is_digits && !is_ordinal {
            continue;
        }
        let Some(label_tok) = tokens.get(i + 2) else {
            continue;
        };
        let label: String = label_tok
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if label.is_empty() {
            continue;
        }
        return Some((normalize_year_token(year_tok), label));
    }
    None
}

fn digits_after_keyword(line: &str, keyword: &str) -> Option<String> {
    let mut from = 0usize;
    while let Some(pos) = line[from..].find(keyword) {
        let after = &line[from + pos + keyword.len()..];
        let after = after.trim_start_matches(' ');
        let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() {
            return Some(digits);
        }
        from += pos + keyword.len();
    }
    None
}

fn label_after_keyword(line: &str, keyword: &str) -> Option<String> {
    let pos = line.find(keyword)?;
    let after = &line[pos + keyword.len()..];
    // The label runs up to the next cell boundary.
    let label = after.split('|').next().unwrap_or("").trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn filename_with_digit_year_fills_both_fields() {
        let meta = extract_sheet_meta("TAHUN 4 INTAN.xlsx", &[]);
        assert_eq!(meta.year, "4");
        assert_eq!(meta.label, "INTAN");
    }

    #[test]
    fn filename_with_ordinal_year_maps_to_digit() {
        let meta = extract_sheet_meta("senarai tahun empat delima.csv", &[]);
        assert_eq!(meta.year, "4");
        assert_eq!(meta.label, "DELIMA");
    }

    #[test]
    fn filename_year_without_label_falls_through_to_header_scan() {
        // "TAHUN 4.xlsx" has no whitespace-separated label token.
        let sheet = rows(&[&["SENARAI MURID", "KELAS MAWAR"]]);
        let meta = extract_sheet_meta("TAHUN 4.xlsx", &sheet);
        assert_eq!(meta.year, "");
        assert_eq!(meta.label, "MAWAR");
    }

    #[test]
    fn header_scan_fills_year_and_label_independently() {
        let sheet = rows(&[
            &["SEKOLAH KEBANGSAAN CONTOH"],
            &["SENARAI MURID TAHUN 5"],
            &["KELAS ZAMRUD", "2026"],
        ]);
        let meta = extract_sheet_meta("senarai_murid.csv", &sheet);
        assert_eq!(meta.year, "5");
        assert_eq!(meta.label, "ZAMRUD");
    }

    #[test]
    fn header_scan_stops_after_fifteen_rows() {
        let mut sheet = rows(&[]);
        for _ in 0..15 {
            sheet.push(vec!["BIL".to_string(), "NAMA".to_string()]);
        }
        sheet.push(vec!["TAHUN 3 KELAS AKID".to_string()]);
        let meta = extract_sheet_meta("murid.csv", &sheet);
        assert_eq!(meta.year, "");
        assert_eq!(meta.label, "");
    }

    #[test]
    fn keyword_fallback_searches_the_file_name() {
        let meta = extract_sheet_meta("murid_anggerik_2026.csv", &[]);
        assert_eq!(meta.year, "");
        assert_eq!(meta.label, "ANGGERIK");
    }

    #[test]
    fn nothing_found_leaves_both_fields_empty() {
        let meta = extract_sheet_meta("senarai_murid.csv", &[]);
        assert_eq!(meta, SheetMeta::default());
    }

    #[test]
    fn unrecognized_year_tokens_pass_through() {
        assert_eq!(normalize_year_token(" tujuh "), "TUJUH");
        assert_eq!(normalize_year_token("enam"), "6");
    }
}
