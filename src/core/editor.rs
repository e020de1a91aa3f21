use super::note::{Note, NoteDraft, NoteId};
use super::tags::join_tags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Closed,
    Create,
    Edit(NoteId),
}

/// What a successful save asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(NoteDraft),
    Update(NoteId, NoteDraft),
}

/// Identifies one save round trip. Results carrying an older ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket(u64);

/// Create/edit dialog state. Fields are raw input; they are only normalized on save.
#[derive(Debug, Clone)]
pub struct Editor {
    mode: EditorMode,
    pub title: String,
    pub body: String,
    pub tags: String,
    in_flight: Option<SaveTicket>,
    next_ticket: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            mode: EditorMode::Closed,
            title: String::new(),
            body: String::new(),
            tags: String::new(),
            in_flight: None,
            next_ticket: 0,
        }
    }
}

impl Editor {
    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn open_create(&mut self) {
        self.clear();
        self.mode = EditorMode::Create;
    }

    pub fn open_edit(&mut self, note: &Note) {
        self.mode = EditorMode::Edit(note.id.clone());
        self.title = note.title.clone();
        self.body = note.body.clone();
        self.tags = join_tags(&note.tags);
        self.in_flight = None;
    }

    /// Cancel/close: back to closed with every field cleared.
    pub fn close(&mut self) {
        self.clear();
    }

    /// Save is only offered when the title has content and nothing is in flight.
    pub fn can_save(&self) -> bool {
        self.is_open() && self.in_flight.is_none() && !self.title.trim().is_empty()
    }

    /// Validate and produce the store request. A blank title yields `None` and
    /// leaves the editor untouched. The ticket must come back with the result.
    pub fn save(&mut self) -> Option<(SaveTicket, SaveRequest)> {
        if !self.can_save() {
            return None;
        }
        let draft = NoteDraft::from_input(&self.title, &self.body, &self.tags)?;
        let request = match self.mode {
            EditorMode::Create => SaveRequest::Create(draft),
            EditorMode::Edit(ref id) => SaveRequest::Update(id.clone(), draft),
            EditorMode::Closed => return None,
        };
        self.next_ticket += 1;
        let ticket = SaveTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        Some((ticket, request))
    }

    /// Store acknowledged the write. Closes the editor only if `ticket` belongs to
    /// the session still open; returns whether it did.
    pub fn save_succeeded(&mut self, ticket: SaveTicket) -> bool {
        if self.in_flight != Some(ticket) {
            log::debug!("Ignoring stale save result {:?}", ticket);
            return false;
        }
        self.clear();
        true
    }

    /// Store rejected the write; keep the input so the user can try again.
    pub fn save_failed(&mut self, ticket: SaveTicket) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
    }

    /// A snapshot arrived. If the note being edited is gone, there is nothing left to update.
    pub fn reconcile(&mut self, exists: impl Fn(&NoteId) -> bool) {
        if let EditorMode::Edit(ref id) = self.mode {
            if self.in_flight.is_none() && !exists(id) {
                log::info!("Note {} disappeared while editing; closing editor", id);
                self.clear();
            }
        }
    }

    fn clear(&mut self) {
        self.mode = EditorMode::Closed;
        self.title.clear();
        self.body.clear();
        self.tags.clear();
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::note::sample;

    #[test]
    fn blank_title_is_a_noop() {
        let mut editor = Editor::default();
        editor.open_create();
        editor.title = "   ".into();
        editor.body = "draft body".into();
        assert!(!editor.can_save());
        assert_eq!(editor.save(), None);
        assert_eq!(editor.mode(), &EditorMode::Create);
        assert_eq!(editor.body, "draft body");
        assert!(!editor.is_saving());
    }

    #[test]
    fn create_flow() {
        let mut editor = Editor::default();
        editor.open_create();
        editor.title = " Shopping ".into();
        editor.tags = "Home, errands".into();
        let (ticket, request) = editor.save().unwrap();
        assert_eq!(
            request,
            SaveRequest::Create(NoteDraft {
                title: "Shopping".into(),
                body: String::new(),
                tags: vec!["home".into(), "errands".into()],
            })
        );
        assert!(editor.is_saving());
        assert_eq!(editor.save(), None, "no double submit while saving");

        assert!(editor.save_succeeded(ticket));
        assert_eq!(editor.mode(), &EditorMode::Closed);
        assert!(editor.title.is_empty() && editor.tags.is_empty());
    }

    #[test]
    fn edit_prefills_and_updates() {
        let mut note = sample("n1", false, 10);
        note.body = "old".into();
        note.tags = vec!["a".into(), "b".into()];

        let mut editor = Editor::default();
        editor.open_edit(&note);
        assert_eq!(editor.title, "Note n1");
        assert_eq!(editor.tags, "a, b");

        editor.body = "new".into();
        match editor.save() {
            Some((_, SaveRequest::Update(id, draft))) => {
                assert_eq!(id, NoteId::new("n1"));
                assert_eq!(draft.body, "new");
                assert_eq!(draft.tags, vec!["a", "b"]);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn failure_keeps_input() {
        let mut editor = Editor::default();
        editor.open_create();
        editor.title = "Keep".into();
        editor.body = "me".into();
        let (ticket, _) = editor.save().unwrap();
        editor.save_failed(ticket);
        assert!(editor.is_open());
        assert!(!editor.is_saving());
        assert_eq!(editor.title, "Keep");
        assert_eq!(editor.body, "me");
        assert!(editor.can_save());
    }

    #[test]
    fn close_clears_everything() {
        let mut editor = Editor::default();
        editor.open_edit(&sample("x", true, 1));
        editor.close();
        assert_eq!(editor.mode(), &EditorMode::Closed);
        assert!(editor.title.is_empty());
        assert_eq!(editor.save(), None);
    }

    #[test]
    fn reconcile_closes_when_note_deleted_elsewhere() {
        let mut editor = Editor::default();
        editor.open_edit(&sample("gone", false, 1));
        editor.reconcile(|_| true);
        assert!(editor.is_open());
        editor.reconcile(|_| false);
        assert!(!editor.is_open());
    }

    #[test]
    fn stale_success_keeps_new_draft() {
        let mut editor = Editor::default();
        editor.open_create();
        editor.title = "first".into();
        let (first, _) = editor.save().unwrap();

        editor.close();
        editor.open_create();
        editor.title = "second draft".into();

        assert!(!editor.save_succeeded(first));
        assert_eq!(editor.mode(), &EditorMode::Create);
        assert_eq!(editor.title, "second draft");
        assert!(editor.can_save());
    }

    #[test]
    fn stale_failure_does_not_unlock_newer_save() {
        let mut editor = Editor::default();
        editor.open_create();
        editor.title = "first".into();
        let (first, _) = editor.save().unwrap();

        editor.open_edit(&sample("n2", false, 1));
        let (second, _) = editor.save().unwrap();
        assert_ne!(first, second);

        editor.save_failed(first);
        assert!(editor.is_saving());
        assert!(editor.save_succeeded(second));
        assert!(!editor.is_open());
    }
}
