use super::note::{Note, NoteId};

/// A note waiting for delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: NoteId,
    pub title: String,
    pub in_flight: bool,
    pub error: Option<String>,
}

/// Delete-confirmation dialog. Stays open until the delete is acknowledged or the user cancels.
#[derive(Debug, Clone, Default)]
pub struct DeleteDialog {
    pending: Option<PendingDelete>,
}

impl DeleteDialog {
    pub fn open(&mut self, note: &Note) {
        self.pending = Some(PendingDelete {
            id: note.id.clone(),
            title: note.title.clone(),
            in_flight: false,
            error: None,
        });
    }

    pub fn pending(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// User confirmed. Returns the id to delete, or `None` if closed or already running.
    pub fn confirm(&mut self) -> Option<NoteId> {
        let pending = self.pending.as_mut()?;
        if pending.in_flight {
            return None;
        }
        pending.in_flight = true;
        pending.error = None;
        Some(pending.id.clone())
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// A snapshot arrived. Close if the note vanished and no delete of ours is running.
    pub fn reconcile(&mut self, exists: impl Fn(&NoteId) -> bool) {
        if let Some(ref pending) = self.pending {
            if !pending.in_flight && !exists(&pending.id) {
                self.pending = None;
            }
        }
    }

    /// Delete of `id` finished. Only closes on success; a failure stays visible for retry.
    pub fn finish(&mut self, id: &NoteId, result: Result<(), String>) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if &pending.id != id {
            return;
        }
        match result {
            Ok(()) => self.pending = None,
            Err(e) => {
                pending.in_flight = false;
                pending.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::note::sample;

    #[test]
    fn confirm_then_success_closes() {
        let mut dialog = DeleteDialog::default();
        dialog.open(&sample("x", false, 1));
        assert_eq!(dialog.pending().unwrap().title, "Note x");
        let id = dialog.confirm().unwrap();
        assert_eq!(id, NoteId::new("x"));
        assert_eq!(dialog.confirm(), None, "no second delete while in flight");
        dialog.finish(&id, Ok(()));
        assert!(!dialog.is_open());
    }

    #[test]
    fn failure_keeps_dialog_open_for_retry() {
        let mut dialog = DeleteDialog::default();
        dialog.open(&sample("x", false, 1));
        let id = dialog.confirm().unwrap();
        dialog.finish(&id, Err("permission denied".into()));
        let pending = dialog.pending().unwrap();
        assert!(!pending.in_flight);
        assert_eq!(pending.error.as_deref(), Some("permission denied"));

        assert_eq!(dialog.confirm(), Some(id.clone()));
        assert!(dialog.pending().unwrap().error.is_none());
    }

    #[test]
    fn cancel_has_no_effect_on_store() {
        let mut dialog = DeleteDialog::default();
        dialog.open(&sample("x", false, 1));
        dialog.cancel();
        assert!(!dialog.is_open());
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn closes_when_note_removed_elsewhere() {
        let mut dialog = DeleteDialog::default();
        dialog.open(&sample("x", false, 1));
        dialog.reconcile(|_| true);
        assert!(dialog.is_open());
        dialog.reconcile(|_| false);
        assert!(!dialog.is_open());
    }

    #[test]
    fn in_flight_delete_waits_for_its_result() {
        let mut dialog = DeleteDialog::default();
        dialog.open(&sample("x", false, 1));
        let id = dialog.confirm().unwrap();
        dialog.reconcile(|_| false);
        assert!(dialog.is_open());
        dialog.finish(&id, Ok(()));
        assert!(!dialog.is_open());
    }

    #[test]
    fn stale_result_is_ignored() {
        let mut dialog = DeleteDialog::default();
        dialog.open(&sample("y", false, 1));
        dialog.finish(&NoteId::new("x"), Err("boom".into()));
        assert!(dialog.pending().unwrap().error.is_none());
    }
}
