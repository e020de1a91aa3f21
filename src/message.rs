use notepin::core::editor::SaveTicket;
use notepin::core::note::{Note, NoteId};
use notepin::core::notice::Operation;

#[derive(Debug, Clone)]
pub enum Message {
    // Live query
    Snapshot(Result<Vec<Note>, String>),

    // Search
    SearchInput(String),
    SearchSettled(String),

    // Editor dialog
    OpenCreate,
    OpenEdit(NoteId),
    CloseEditor,
    EditorTitle(String),
    EditorBodyAction(cosmic::widget::text_editor::Action),
    EditorTags(String),
    SaveEditor,
    Saved(Operation, SaveTicket, Result<(), String>),

    // Pin
    TogglePin(NoteId),
    PinToggled(Result<(), String>),

    // Delete confirmation
    ConfirmDelete(NoteId),
    CancelDelete,
    DeleteConfirmed,
    Deleted(NoteId, Result<(), String>),

    // Failure notices
    DismissNotice(u64),
}
