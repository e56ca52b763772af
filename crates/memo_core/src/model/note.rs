//! Note domain record.
//!
//! # Responsibility
//! - Define the single entity persisted, exported and rendered by memo.
//! - Apply field edits while keeping `updated_at` current.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - `created_at` is immutable; every effective edit refreshes `updated_at`.
//! - `tags` keep insertion order and contain no duplicates.

use crate::clock::Clock;
use serde::Serialize;
use uuid::Uuid;

/// Title given to freshly created notes.
pub const PLACEHOLDER_TITLE: &str = "New memo";

/// Opaque identifier for a note.
///
/// Kept as a string alias because imported documents may carry ids produced
/// by other tools.
pub type NoteId = String;

/// Canonical note record.
///
/// Serialized with camelCase field names to stay compatible with existing
/// backup files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub pinned: bool,
    /// ISO-8601 UTC, millisecond precision.
    pub created_at: String,
    /// ISO-8601 UTC, millisecond precision. Never earlier than `created_at`.
    pub updated_at: String,
}

/// Single field change applied through [`Note::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteChange {
    SetTitle(String),
    SetContent(String),
    /// Appends a trimmed tag unless blank or already present.
    AddTag(String),
    RemoveTag(String),
    /// Replaces the tag list; blanks and duplicates are dropped.
    SetTags(Vec<String>),
    SetPinned(bool),
    TogglePin,
}

impl Note {
    /// Creates an empty note with a generated id and placeholder title.
    pub fn new(clock: &dyn Clock) -> Self {
        let now = clock.now_iso();
        Self {
            id: generate_note_id(),
            title: PLACEHOLDER_TITLE.to_string(),
            content: String::new(),
            tags: Vec::new(),
            pinned: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Applies one field change.
    ///
    /// Returns `true` when the note changed; `updated_at` is refreshed only in
    /// that case.
    pub fn apply(&mut self, change: NoteChange, clock: &dyn Clock) -> bool {
        let changed = match change {
            NoteChange::SetTitle(title) => replace_if_different(&mut self.title, title),
            NoteChange::SetContent(content) => replace_if_different(&mut self.content, content),
            NoteChange::AddTag(tag) => self.add_tag(&tag),
            NoteChange::RemoveTag(tag) => self.remove_tag(&tag),
            NoteChange::SetTags(tags) => {
                let normalized = normalize_tag_list(tags);
                replace_if_different(&mut self.tags, normalized)
            }
            NoteChange::SetPinned(pinned) => replace_if_different(&mut self.pinned, pinned),
            NoteChange::TogglePin => {
                self.pinned = !self.pinned;
                true
            }
        };

        if changed {
            self.touch(clock);
        }
        changed
    }

    /// Returns whether any tag equals `tag` exactly.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    fn add_tag(&mut self, tag: &str) -> bool {
        let Some(value) = clean_tag(tag) else {
            return false;
        };
        if self.has_tag(&value) {
            return false;
        }
        self.tags.push(value);
        true
    }

    fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    fn touch(&mut self, clock: &dyn Clock) {
        let now = clock.now_iso();
        // Clock skew must not break `updated_at >= created_at`.
        self.updated_at = if now < self.created_at {
            self.created_at.clone()
        } else {
            now
        };
    }
}

/// Generates a fresh opaque note id.
pub fn generate_note_id() -> NoteId {
    Uuid::new_v4().to_string()
}

/// Trims one tag value; blank values yield `None`.
pub fn clean_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims tags, drops blanks and duplicates, keeps first-seen order.
pub fn normalize_tag_list(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(value) = clean_tag(&tag) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
    }
    unique
}

fn replace_if_different<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
