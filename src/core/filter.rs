use super::note::Note;

/// Case-insensitive substring filter over title, body and tags, returning
/// positions into `notes`.
///
/// A blank or whitespace-only query keeps every note. Any other query is matched
/// as typed, surrounding whitespace included. Input order is preserved, so the
/// store's display order carries through.
pub fn filter_indices(notes: &[Note], query: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..notes.len()).collect();
    }
    let needle = query.to_lowercase();
    notes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.matches(&needle))
        .map(|(i, _)| i)
        .collect()
}
