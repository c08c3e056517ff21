//! String utilities for the domain layer.

/// Canonical form used when comparing tags and category names.
///
/// Trims surrounding whitespace, lowercases, and collapses inner runs of
/// whitespace to a single space so `"  Late  Night "` and `"late night"`
/// compare equal.
pub fn normalize_tag(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a free-form tag field into normalized tags.
///
/// Catalog feeds sometimes deliver tags as one comma/slash separated string
/// instead of a list. Empty fragments are dropped.
pub fn split_tags(s: &str) -> Vec<String> {
    s.split([',', '/', '|', '#'])
        .map(normalize_tag)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Truncate a display label to `max_chars` characters with an ellipsis.
pub fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
