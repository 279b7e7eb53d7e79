use crate::domain::model::Domain;

/// Maps a raw domain name to its canonical domain, ignoring case and
/// surrounding whitespace.
pub fn normalize_domain(raw: &str) -> Option<Domain> {
    match raw.trim().to_lowercase().as_str() {
        "people" => Some(Domain::People),
        "process" => Some(Domain::Process),
        "business" => Some(Domain::Business),
        _ => None,
    }
}

/// Duplicate-detection key: trimmed, lowercased, internal whitespace runs
/// collapsed to one space.
pub fn normalize_text(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
