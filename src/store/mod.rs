pub mod firestore;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::NotepinConfig;
use crate::core::note::{Note, NoteDraft, NoteId, NotePatch};

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed document: {0}")]
    Decode(String),
    #[error("note {0} not found")]
    NotFound(NoteId),
}

/// Full result sets, already in display order, one per upstream change.
pub type SnapshotStream = BoxStream<'static, Result<Vec<Note>, StoreError>>;

/// A notes collection in some document store.
///
/// Timestamps are assigned by the store, never by the caller. Every `update`
/// refreshes `updated_at`, even when the patch is empty.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Standing query ordered by (pinned desc, updated_at desc). The first item is the
    /// current state; later items follow upstream changes. Dropping the stream releases it.
    fn subscribe(&self) -> SnapshotStream;

    async fn add(&self, draft: NoteDraft) -> Result<NoteId, StoreError>;

    async fn update(&self, id: &NoteId, patch: NotePatch) -> Result<(), StoreError>;

    async fn delete(&self, id: &NoteId) -> Result<(), StoreError>;
}

/// Open the collection named in the config.
pub fn open(config: &NotepinConfig) -> Result<Arc<dyn NoteStore>, StoreError> {
    let project = config.firestore_project.trim();
    if project.is_empty() {
        log::warn!("No Firestore project configured; notes live in memory for this session");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let api_key = Some(config.firestore_api_key.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string);
    let store = FirestoreStore::new(project, &config.collection, api_key, config.poll_interval())?;
    log::info!(
        "Using Firestore project {} collection {}",
        project,
        config.collection
    );
    Ok(Arc::new(store))
}
