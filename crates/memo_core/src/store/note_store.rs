//! Note store: ordered collection plus active selection.
//!
//! # Responsibility
//! - Provide create/insert/update/remove/find over the note list.
//! - Keep the active id pointing at an existing note (or none).
//!
//! # Invariants
//! - Ids are unique: `insert` rejects ids already present and `replace_all`
//!   regenerates repeated ones.
//! - `remove` and `replace_all` never leave the collection empty.
//! - `active_id`, when set, always references a note in `notes`.

use crate::clock::Clock;
use crate::model::normalize::ensure_unique_ids;
use crate::model::note::{Note, NoteChange, NoteId};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A note with this id is already present.
    DuplicateId(NoteId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "note id already exists: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Where [`NoteStore::insert`] places a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Front,
    Back,
    /// Clamped to the collection length.
    At(usize),
}

/// Ordered note collection with an active selection.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    active_id: Option<NoteId>,
}

impl NoteStore {
    /// Creates an empty store. Call [`NoteStore::ensure_not_empty`] or
    /// [`NoteStore::replace_all`] before handing it to callers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure factory for a fresh note; does not insert it.
    pub fn create_note(&self, clock: &dyn Clock) -> Note {
        Note::new(clock)
    }

    /// Inserts a note at `position`.
    ///
    /// # Errors
    /// - [`StoreError::DuplicateId`] when the id is already present.
    pub fn insert(&mut self, note: Note, position: InsertPosition) -> StoreResult<()> {
        if self.position_of(&note.id).is_some() {
            return Err(StoreError::DuplicateId(note.id));
        }
        let index = match position {
            InsertPosition::Front => 0,
            InsertPosition::Back => self.notes.len(),
            InsertPosition::At(index) => index.min(self.notes.len()),
        };
        self.notes.insert(index, note);
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Applies `change` to the note with `id`.
    ///
    /// Returns `false` when the id is unknown or the change was a no-op.
    pub fn update(&mut self, id: &str, change: NoteChange, clock: &dyn Clock) -> bool {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => note.apply(change, clock),
            None => {
                debug!("event=note_update module=store status=skipped reason=not_found");
                false
            }
        }
    }

    /// Deletes the note with `id` and re-selects a neighbour.
    ///
    /// The note previously located just before the removed one becomes
    /// active (index clamped to 0). When the collection empties, a fresh
    /// note is synthesized and activated.
    ///
    /// Returns `false` when `id` is unknown.
    pub fn remove(&mut self, id: &str, clock: &dyn Clock) -> bool {
        let Some(index) = self.position_of(id) else {
            return false;
        };
        self.notes.remove(index);

        if self.notes.is_empty() {
            let replacement = Note::new(clock);
            self.active_id = Some(replacement.id.clone());
            self.notes.push(replacement);
            info!("event=note_remove module=store status=ok replacement=true");
        } else {
            let next = index.saturating_sub(1);
            self.active_id = Some(self.notes[next].id.clone());
            info!("event=note_remove module=store status=ok replacement=false");
        }
        true
    }

    /// Activates `id` when it differs from the current selection and exists.
    ///
    /// Returns whether the selection changed.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.active_id.as_deref() == Some(id) || self.find_by_id(id).is_none() {
            return false;
        }
        self.active_id = Some(id.to_string());
        true
    }

    /// Inserts and activates a fresh note when the collection is empty.
    ///
    /// Returns `true` when a note was synthesized.
    pub fn ensure_not_empty(&mut self, clock: &dyn Clock) -> bool {
        if !self.notes.is_empty() {
            return false;
        }
        let note = Note::new(clock);
        self.active_id = Some(note.id.clone());
        self.notes.push(note);
        true
    }

    /// Replaces the whole collection.
    ///
    /// Empty input synthesizes a fresh note; otherwise the most recently
    /// updated note becomes active. Collection order is preserved, and a
    /// note repeating an earlier id is given a fresh one.
    pub fn replace_all(&mut self, mut notes: Vec<Note>, clock: &dyn Clock) {
        ensure_unique_ids(&mut notes);
        self.notes = notes;
        self.active_id = None;
        if self.ensure_not_empty(clock) {
            return;
        }
        self.active_id = self
            .notes
            .iter()
            .max_by(|a, b| a.updated_at.cmp(&b.updated_at))
            .map(|note| note.id.clone());
    }

    /// Reorders the collection by `updated_at` descending (stable).
    pub fn sort_by_recency(&mut self) {
        self.notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_id
            .as_deref()
            .and_then(|id| self.find_by_id(id))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{InsertPosition, NoteStore, StoreError};
    use crate::clock::SteppingClock;

    #[test]
    fn insert_rejects_duplicate_id() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let mut store = NoteStore::new();
        let note = store.create_note(&clock);
        store.insert(note.clone(), InsertPosition::Front).unwrap();

        let err = store.insert(note.clone(), InsertPosition::Back).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(note.id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_at_clamps_index() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let mut store = NoteStore::new();
        let first = store.create_note(&clock);
        let second = store.create_note(&clock);
        store.insert(first.clone(), InsertPosition::Back).unwrap();
        store.insert(second.clone(), InsertPosition::At(99)).unwrap();
        assert_eq!(store.notes()[1].id, second.id);
    }

    #[test]
    fn replace_all_activates_most_recent() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let mut store = NoteStore::new();
        let older = store.create_note(&clock);
        let newer = store.create_note(&clock);
        store.replace_all(vec![older.clone(), newer.clone()], &clock);
        assert_eq!(store.active_id(), Some(newer.id.as_str()));
        assert_eq!(store.notes()[0].id, older.id);
    }

    #[test]
    fn replace_all_with_empty_synthesizes_note() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let mut store = NoteStore::new();
        store.replace_all(Vec::new(), &clock);
        assert_eq!(store.len(), 1);
        assert_eq!(store.active_id(), Some(store.notes()[0].id.as_str()));
    }
}
