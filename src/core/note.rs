use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tags;

/// Opaque document identifier handed out by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Whether the (already lowercased) needle occurs in the title, body or any tag.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.body.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Display order: pinned first, then most recently updated.
pub fn display_order(a: &Note, b: &Note) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

pub fn sort_for_display(notes: &mut [Note]) {
    notes.sort_by(display_order);
}

/// The user-editable part of a note, as written on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    /// Build a draft from raw editor input. Returns `None` when the title is blank.
    pub fn from_input(title: &str, body: &str, tag_input: &str) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            body: body.to_string(),
            tags: tags::parse_tags(tag_input),
        })
    }
}

/// Partial update. Fields left as `None` are not touched; `updated_at` is always refreshed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
}

impl NotePatch {
    pub fn content(draft: NoteDraft) -> Self {
        Self {
            title: Some(draft.title),
            body: Some(draft.body),
            tags: Some(draft.tags),
            pinned: None,
        }
    }

    pub fn pinned(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
            ..Self::default()
        }
    }

    pub fn apply(&self, note: &mut Note) {
        if let Some(ref title) = self.title {
            note.title = title.clone();
        }
        if let Some(ref body) = self.body {
            note.body = body.clone();
        }
        if let Some(ref tags) = self.tags {
            note.tags = tags.clone();
        }
        if let Some(pinned) = self.pinned {
            note.pinned = pinned;
        }
    }
}

#[cfg(test)]
pub(crate) fn sample(id: &str, pinned: bool, updated_secs: i64) -> Note {
    let at = DateTime::from_timestamp(updated_secs, 0).unwrap();
    Note {
        id: NoteId::new(id),
        title: format!("Note {}", id),
        body: String::new(),
        tags: Vec::new(),
        pinned,
        created_at: at,
        updated_at: at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_first_then_recency() {
        let a = sample("a", false, 1_000);
        let b = sample("b", true, 500);
        let c = sample("c", true, 2_000);
        let mut notes = vec![a, b, c];
        sort_for_display(&mut notes);
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn draft_rejects_blank_title() {
        assert!(NoteDraft::from_input("", "body", "x").is_none());
        assert!(NoteDraft::from_input("   \t", "body", "x").is_none());
    }

    #[test]
    fn draft_trims_title_and_parses_tags() {
        let draft = NoteDraft::from_input("  Raid night ", "bring snacks", "Gaming, Dota").unwrap();
        assert_eq!(draft.title, "Raid night");
        assert_eq!(draft.body, "bring snacks");
        assert_eq!(draft.tags, vec!["gaming", "dota"]);
    }

    #[test]
    fn pin_patch_leaves_content_alone() {
        let mut note = sample("a", false, 10);
        note.body = "keep me".into();
        NotePatch::pinned(true).apply(&mut note);
        assert!(note.pinned);
        assert_eq!(note.title, "Note a");
        assert_eq!(note.body, "keep me");
    }

    #[test]
    fn matches_checks_tags() {
        let mut note = sample("a", false, 10);
        note.tags = vec!["design".into()];
        assert!(note.matches("sig"));
        assert!(!note.matches("dota"));
    }
}
