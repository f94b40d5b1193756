use super::metadata::ordinal_for_year;

/// Map a (year, label) pair onto one class name, preferring an existing
/// registry entry so the class list does not fragment into near-duplicates
/// ("TAHUN 4 INTAN" vs "4 INTAN" vs "T4 INTAN"). Staged, first success wins:
/// full match, year-only match, then synthesis. Never fails; empty inputs
/// fall through to a degenerate synthesized name by design.
pub fn resolve_class(year: &str, label: &str, registry: &[String]) -> String {
    let label_up = label.trim().to_uppercase();

    // Stage 1: label and year both present in an existing name.
    for name in registry {
        let up = name.to_uppercase();
        if up.contains(&label_up) && contains_year(&up, year) {
            return name.clone();
        }
    }

    // Stage 2: any class of the same year.
    for name in registry {
        if contains_year(&name.to_uppercase(), year) {
            return name.clone();
        }
    }

    // Stage 3: synthesize; becomes a registry entry once a student is saved.
    format!("TAHUN {} {}", year, label_up).trim().to_string()
}

fn contains_year(name_up: &str, year: &str) -> bool {
    if year.is_empty() {
        return false;
    }
    if name_up.contains(year) {
        return true;
    }
    ordinal_for_year(year).is_some_and(|word| name_up.contains(word))
}
