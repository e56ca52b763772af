//! Note persistence gateway over a key-value slot store.
//!
//! # Responsibility
//! - Save the full note collection as one JSON array slot.
//! - Load and normalize the collection, recovering from any corruption.
//! - Store the theme preference in its own slot.
//!
//! # Invariants
//! - `load` never returns an error; corrupt data reads as an empty list.
//! - Note contents are never written to logs.

use crate::clock::Clock;
use crate::model::normalize::normalize_records;
use crate::model::note::Note;
use crate::persistence::kv::{KvStorage, StorageResult};
use log::{error, info, warn};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Instant;

/// Slot holding the JSON array of all notes.
pub const NOTES_SLOT_KEY: &str = "hp-memo-notes-v1";
/// Slot holding the theme preference string.
pub const THEME_SLOT_KEY: &str = "hp-memo-theme";

/// UI colour theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unsupported theme `{other}`; expected light|dark")),
        }
    }
}

/// Reads and writes the note collection through named slots.
pub struct NoteGateway<S: KvStorage> {
    storage: S,
    notes_key: String,
    theme_key: String,
}

impl<S: KvStorage> NoteGateway<S> {
    /// Creates a gateway using the default slot keys.
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, NOTES_SLOT_KEY, THEME_SLOT_KEY)
    }

    /// Creates a gateway using caller-provided slot keys.
    pub fn with_keys(storage: S, notes_key: impl Into<String>, theme_key: impl Into<String>) -> Self {
        Self {
            storage,
            notes_key: notes_key.into(),
            theme_key: theme_key.into(),
        }
    }

    /// Serializes `notes` and overwrites the notes slot.
    ///
    /// # Errors
    /// - [`crate::StorageError::Serialize`] when JSON encoding fails.
    /// - Any backend error from [`KvStorage::set`] (e.g. quota exceeded).
    pub fn save(&mut self, notes: &[Note]) -> StorageResult<()> {
        let started_at = Instant::now();
        let result = self.write_notes(notes);

        match &result {
            Ok(()) => info!(
                "event=notes_save module=persistence status=ok count={} duration_ms={}",
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=notes_save module=persistence status=error count={} error={err}",
                notes.len()
            ),
        }
        result
    }

    /// Loads and normalizes the note collection.
    ///
    /// Absent, unreadable, unparsable or non-array slots yield an empty list.
    pub fn load(&self, clock: &dyn Clock) -> Vec<Note> {
        let raw = match self.storage.get(&self.notes_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=notes_load module=persistence status=ok count=0 reason=absent");
                return Vec::new();
            }
            Err(err) => {
                warn!("event=notes_load module=persistence status=recovered reason=read_failed error={err}");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                warn!("event=notes_load module=persistence status=recovered reason=not_array");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=persistence status=recovered reason=parse_failed line={} column={}",
                    err.line(),
                    err.column()
                );
                return Vec::new();
            }
        };

        let notes = normalize_records(&records, clock);
        info!(
            "event=notes_load module=persistence status=ok count={}",
            notes.len()
        );
        notes
    }

    /// Reads the theme preference; unknown or missing values read as light.
    pub fn load_theme(&self) -> Theme {
        match self.storage.get(&self.theme_key) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("event=theme_load module=persistence status=recovered error={err}");
                Theme::default()
            }
        }
    }

    /// Persists the theme preference.
    pub fn save_theme(&mut self, theme: Theme) -> StorageResult<()> {
        self.storage.set(&self.theme_key, theme.as_str())
    }

    fn write_notes(&mut self, notes: &[Note]) -> StorageResult<()> {
        let payload = serde_json::to_string(notes)?;
        self.storage.set(&self.notes_key, &payload)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
