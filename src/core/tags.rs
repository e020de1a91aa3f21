/// Split comma-separated tag input into trimmed, lowercased, non-empty tags.
/// Order is kept and duplicates are not removed.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Inverse of [`parse_tags`] for pre-filling the editor.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
