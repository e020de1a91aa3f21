use super::filter::filter_indices;
use super::note::{Note, NoteId};

/// The last snapshot delivered by the store plus the filtered view derived from it.
///
/// Both are only ever changed together, so the visible list cannot drift from the source.
#[derive(Debug, Default)]
pub struct NoteList {
    notes: Vec<Note>,
    query: String,
    visible: Vec<usize>,
    loaded: bool,
    filter_passes: usize,
}

impl NoteList {
    /// Replace the whole list with a fresh snapshot.
    pub fn replace_snapshot(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.loaded = true;
        self.refilter();
    }

    /// Apply a settled search query.
    pub fn apply_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = filter_indices(&self.notes, &self.query);
        self.filter_passes += 1;
    }

    /// True once the first snapshot has arrived.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn visible(&self) -> impl Iterator<Item = &Note> {
        self.visible.iter().map(|&i| &self.notes[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Number of times the filter has run.
    pub fn filter_passes(&self) -> usize {
        self.filter_passes
    }
}
