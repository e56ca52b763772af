//! Note-taking session: the explicit context every user intent runs against.
//!
//! # Responsibility
//! - Own one note store, one persistence gateway and one save scheduler.
//! - Translate user intents into store mutations plus debounced saves.
//! - Gate destructive imports behind an explicit confirmation step.
//!
//! # Invariants
//! - After `open` the store holds at least one note and a valid active id.
//! - Every effective mutation marks the status `Saving` and reschedules the
//!   save; selection, filter and search changes do not.
//! - A failed save or import never alters in-memory notes.

use crate::clock::Clock;
use crate::model::note::{Note, NoteChange, NoteId};
use crate::persistence::gateway::{NoteGateway, Theme};
use crate::persistence::kv::{KvStorage, StorageResult};
use crate::query::visible::{list_item, visible_notes, FilterMode, NoteListItem};
use crate::scheduler::SaveScheduler;
use crate::store::note_store::{InsertPosition, NoteStore};
use crate::transfer::codec::{export_all, export_file_name, import_all, TransferResult};
use log::{debug, info};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Persistence status surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// A save is scheduled but not yet written.
    Saving,
    /// Last write failed; message is safe to display.
    Error(String),
}

impl Display for SaveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Saved => f.write_str("saved"),
            Self::Saving => f.write_str("saving"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Parsed, normalized backup awaiting confirmation.
///
/// Dropping it abandons the import without touching the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    notes: Vec<Note>,
}

impl PendingImport {
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// One independent note-taking session.
pub struct MemoSession<S: KvStorage, D: SaveScheduler> {
    store: NoteStore,
    gateway: NoteGateway<S>,
    scheduler: D,
    clock: Box<dyn Clock>,
    save_delay: Duration,
    filter: FilterMode,
    search: String,
    status: SaveStatus,
    theme: Theme,
}

impl<S: KvStorage, D: SaveScheduler> MemoSession<S, D> {
    /// Loads persisted notes and prepares the session.
    ///
    /// An empty or unreadable slot bootstraps one fresh note and saves it
    /// immediately. Otherwise notes are ordered most-recently-updated first
    /// and the first becomes active.
    pub fn open(
        gateway: NoteGateway<S>,
        scheduler: D,
        clock: Box<dyn Clock>,
        save_delay: Duration,
    ) -> Self {
        let notes = gateway.load(clock.as_ref());
        let theme = gateway.load_theme();
        let mut session = Self {
            store: NoteStore::new(),
            gateway,
            scheduler,
            clock,
            save_delay,
            filter: FilterMode::All,
            search: String::new(),
            status: SaveStatus::Saved,
            theme,
        };

        if notes.is_empty() {
            session.store.ensure_not_empty(session.clock.as_ref());
            // Status already reflects the outcome.
            let _ = session.save_now();
        } else {
            session.store.replace_all(notes, session.clock.as_ref());
            session.store.sort_by_recency();
            if let Some(first) = session.store.notes().first().map(|note| note.id.clone()) {
                session.store.set_active(&first);
            }
        }

        info!(
            "event=session_open module=service status=ok count={} theme={}",
            session.store.len(),
            session.theme
        );
        session
    }

    /// Creates a note at the front of the collection and activates it.
    pub fn new_note(&mut self) -> NoteId {
        let note = self.store.create_note(self.clock.as_ref());
        let id = note.id.clone();
        // Fresh UUIDs cannot collide with existing ids.
        if self.store.insert(note, InsertPosition::Front).is_ok() {
            self.store.set_active(&id);
            self.mark_dirty();
        }
        id
    }

    /// Activates `id`; no save is scheduled.
    pub fn select(&mut self, id: &str) -> bool {
        self.store.set_active(id)
    }

    /// Applies `change` to note `id`; schedules a save when it changed.
    pub fn edit(&mut self, id: &str, change: NoteChange) -> bool {
        let changed = self.store.update(id, change, self.clock.as_ref());
        if changed {
            self.mark_dirty();
        }
        changed
    }

    /// Applies `change` to the active note.
    pub fn edit_active(&mut self, change: NoteChange) -> bool {
        match self.store.active_id().map(str::to_string) {
            Some(id) => self.edit(&id, change),
            None => false,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        self.edit_active(NoteChange::SetTitle(title.into()))
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        self.edit_active(NoteChange::SetContent(content.into()))
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.edit_active(NoteChange::AddTag(tag.into()))
    }

    pub fn remove_tag(&mut self, tag: impl Into<String>) -> bool {
        self.edit_active(NoteChange::RemoveTag(tag.into()))
    }

    pub fn toggle_pin(&mut self) -> bool {
        self.edit_active(NoteChange::TogglePin)
    }

    /// Deletes note `id` and re-selects a neighbour (or a fresh note).
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.store.remove(id, self.clock.as_ref());
        if removed {
            self.mark_dirty();
        }
        removed
    }

    pub fn delete_active(&mut self) -> bool {
        match self.store.active_id().map(str::to_string) {
            Some(id) => self.delete(&id),
            None => false,
        }
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Visible notes for the current filter and search term.
    pub fn visible_notes(&self) -> Vec<&Note> {
        visible_notes(self.store.notes(), self.filter, &self.search)
    }

    /// List-item projections of [`MemoSession::visible_notes`].
    pub fn visible_items(&self) -> Vec<NoteListItem> {
        let active = self.store.active_id();
        self.visible_notes()
            .into_iter()
            .map(|note| list_item(note, active))
            .collect()
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn find(&self, id: &str) -> Option<&Note> {
        self.store.find_by_id(id)
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.store.active_note()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.store.active_id()
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    /// Writes when the debounce deadline has elapsed.
    ///
    /// Returns `true` when a write was attempted; the outcome is in
    /// [`MemoSession::status`].
    pub fn tick(&mut self) -> bool {
        if !self.scheduler.take_due() {
            return false;
        }
        // Status already reflects the outcome.
        let _ = self.write();
        true
    }

    /// Saves immediately, superseding any pending debounced save.
    pub fn save_now(&mut self) -> StorageResult<()> {
        self.scheduler.cancel();
        self.write()
    }

    /// Saves only when a debounced save is still pending.
    pub fn flush(&mut self) -> StorageResult<()> {
        if self.scheduler.is_pending() {
            return self.save_now();
        }
        Ok(())
    }

    /// Encodes every note as a pretty-printed backup document.
    pub fn export(&self) -> TransferResult<String> {
        export_all(self.store.notes())
    }

    /// Backup file name for the clock's current local date.
    pub fn export_file_name(&self) -> String {
        export_file_name(self.clock.local_date())
    }

    /// Parses and normalizes a backup without changing the session.
    pub fn prepare_import(&self, json_text: &str) -> TransferResult<PendingImport> {
        let notes = import_all(json_text, self.clock.as_ref())?;
        Ok(PendingImport { notes })
    }

    /// Replaces the whole collection with a confirmed import.
    ///
    /// The most recently updated imported note becomes active; an empty
    /// import leaves one fresh note. Returns the resulting note count.
    pub fn confirm_import(&mut self, pending: PendingImport) -> usize {
        self.store.replace_all(pending.notes, self.clock.as_ref());
        self.mark_dirty();
        info!(
            "event=import_confirm module=service status=ok count={}",
            self.store.len()
        );
        self.store.len()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets and immediately persists the theme preference.
    pub fn set_theme(&mut self, theme: Theme) -> StorageResult<()> {
        self.gateway.save_theme(theme)?;
        self.theme = theme;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> StorageResult<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn gateway(&self) -> &NoteGateway<S> {
        &self.gateway
    }

    pub fn scheduler(&self) -> &D {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut D {
        &mut self.scheduler
    }

    fn mark_dirty(&mut self) {
        self.status = SaveStatus::Saving;
        self.scheduler.schedule(self.save_delay);
        debug!("event=save_schedule module=service status=ok");
    }

    fn write(&mut self) -> StorageResult<()> {
        let result = self.gateway.save(self.store.notes());
        self.status = match &result {
            Ok(()) => SaveStatus::Saved,
            Err(err) => SaveStatus::Error(err.to_string()),
        };
        result
    }
}
