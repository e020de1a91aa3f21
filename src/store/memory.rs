use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use futures::StreamExt;
use tokio::sync::watch;

use super::{NoteStore, SnapshotStream, StoreError};
use crate::core::note::{Note, NoteDraft, NoteId, NotePatch, sort_for_display};

struct Inner {
    notes: Vec<Note>,
    last_stamp: DateTime<Utc>,
}

impl Inner {
    /// Store clock. Strictly increasing so consecutive writes never tie.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = if now > self.last_stamp {
            now
        } else {
            self.last_stamp + TimeDelta::microseconds(1)
        };
        self.last_stamp = next;
        next
    }
}

/// In-process notes collection with live snapshots over a watch channel.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    tx: Arc<watch::Sender<Vec<Note>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                notes: Vec::new(),
                last_stamp: DateTime::<Utc>::MIN_UTC,
            })),
            tx: Arc::new(tx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic mid-write leaves plain data behind; keep serving it.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, inner: &mut Inner) {
        sort_for_display(&mut inner.notes);
        self.tx.send_replace(inner.notes.clone());
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    fn subscribe(&self) -> SnapshotStream {
        let rx = self.tx.subscribe();
        futures::stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let snapshot = rx.borrow_and_update().clone();
            Some((Ok(snapshot), (rx, false)))
        })
        .boxed()
    }

    async fn add(&self, draft: NoteDraft) -> Result<NoteId, StoreError> {
        let mut inner = self.lock();
        let now = inner.stamp();
        let id = NoteId::new(uuid::Uuid::new_v4().simple().to_string());
        inner.notes.push(Note {
            id: id.clone(),
            title: draft.title,
            body: draft.body,
            tags: draft.tags,
            pinned: false,
            created_at: now,
            updated_at: now,
        });
        self.publish(&mut inner);
        log::debug!("memory store: added {}", id);
        Ok(id)
    }

    async fn update(&self, id: &NoteId, patch: NotePatch) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let now = inner.stamp();
        let note = inner
            .notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply(note);
        note.updated_at = now;
        self.publish(&mut inner);
        log::debug!("memory store: updated {}", id);
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.notes.len();
        inner.notes.retain(|n| &n.id != id);
        if inner.notes.len() != before {
            self.publish(&mut inner);
            log::debug!("memory store: deleted {}", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            body: String::new(),
            tags: Vec::new(),
        }
    }

    async fn next(stream: &mut SnapshotStream) -> Vec<Note> {
        stream.next().await.unwrap().unwrap()
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    #[tokio::test]
    async fn first_item_is_current_state() {
        let store = MemoryStore::new();
        store.add(draft("existing")).await.unwrap();
        let mut stream = store.subscribe();
        assert_eq!(titles(&next(&mut stream).await), vec!["existing"]);
    }

    #[tokio::test]
    async fn create_assigns_store_fields() {
        let store = MemoryStore::new();
        let id = store.add(draft("hello")).await.unwrap();
        let mut stream = store.subscribe();
        let notes = next(&mut stream).await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, id);
        assert!(!notes[0].pinned);
        assert_eq!(notes[0].created_at, notes[0].updated_at);
    }

    #[tokio::test]
    async fn snapshots_follow_display_order() {
        let store = MemoryStore::new();
        let a = store.add(draft("a")).await.unwrap();
        let b = store.add(draft("b")).await.unwrap();
        store.add(draft("c")).await.unwrap();
        store.update(&b, NotePatch::pinned(true)).await.unwrap();
        store.update(&a, NotePatch::pinned(true)).await.unwrap();

        let mut stream = store.subscribe();
        assert_eq!(titles(&next(&mut stream).await), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn toggle_pin_touches_only_that_note() {
        let store = MemoryStore::new();
        let a = store.add(draft("a")).await.unwrap();
        let b = store.add(draft("b")).await.unwrap();
        let mut stream = store.subscribe();
        let before = next(&mut stream).await;

        store.update(&a, NotePatch::pinned(true)).await.unwrap();
        let after = next(&mut stream).await;

        let find = |notes: &[Note], id: &NoteId| notes.iter().find(|n| &n.id == id).cloned().unwrap();
        let (a0, a1) = (find(&before, &a), find(&after, &a));
        assert!(a1.pinned);
        assert!(a1.updated_at > a0.updated_at);
        assert_eq!(a1.created_at, a0.created_at);
        assert_eq!(a1.title, a0.title);
        assert_eq!(find(&before, &b), find(&after, &b));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let store = MemoryStore::new();
        let a = store.add(draft("a")).await.unwrap();
        store.add(draft("b")).await.unwrap();
        let mut stream = store.subscribe();
        next(&mut stream).await;

        store.delete(&a).await.unwrap();
        let notes = next(&mut stream).await;
        assert_eq!(titles(&notes), vec!["b"]);
        assert!(notes.iter().all(|n| n.id != a));
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(&NoteId::new("missing"), NotePatch::pinned(true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        store.delete(&NoteId::new("missing")).await.unwrap();
    }

    #[tokio::test]
    async fn content_update_refreshes_timestamp() {
        let store = MemoryStore::new();
        let id = store.add(draft("old")).await.unwrap();
        let mut stream = store.subscribe();
        let before = next(&mut stream).await.remove(0);

        let patch = NotePatch::content(NoteDraft {
            title: "new".into(),
            body: "body".into(),
            tags: vec!["x".into()],
        });
        store.update(&id, patch).await.unwrap();
        let after = next(&mut stream).await.remove(0);
        assert_eq!(after.title, "new");
        assert_eq!(after.tags, vec!["x"]);
        assert!(after.updated_at > before.updated_at);
        assert!(!after.pinned);
    }

    #[tokio::test]
    async fn every_subscriber_sees_changes() {
        let store = MemoryStore::new();
        let mut one = store.subscribe();
        let mut two = store.subscribe();
        assert!(next(&mut one).await.is_empty());
        assert!(next(&mut two).await.is_empty());

        store.add(draft("shared")).await.unwrap();
        assert_eq!(titles(&next(&mut one).await), vec!["shared"]);
        assert_eq!(titles(&next(&mut two).await), vec!["shared"]);
    }
}
