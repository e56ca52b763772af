//! Filter/search/sort pipeline over the note collection.
//!
//! # Responsibility
//! - Derive the visible, ordered subset of notes for a filter mode and a
//!   free-text search term.
//! - Build list-item summaries for renderers.
//!
//! # Invariants
//! - Pure: the same inputs always yield the same ordered output.
//! - Pinned notes precede unpinned notes; ties order by `updated_at DESC`.
//! - Search is trimmed and case-insensitive over title, content and tags.

use crate::model::note::Note;
use chrono::{DateTime, Local, TimeZone};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Display title used when a note title is empty.
pub const UNTITLED_LABEL: &str = "(untitled)";
/// Snippet shown when a note has no content.
pub const EMPTY_SNIPPET: &str = "…";

const DISPLAY_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// List filter mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Pinned,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pinned => "pinned",
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pinned" => Ok(Self::Pinned),
            other => Err(format!("unsupported filter `{other}`; expected all|pinned")),
        }
    }
}

/// Summary projection consumed by list renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: String,
    /// Title, or [`UNTITLED_LABEL`] when empty.
    pub display_title: String,
    /// First content line, or [`EMPTY_SNIPPET`] when empty.
    pub snippet: String,
    pub pinned: bool,
    pub updated_at: String,
    /// `updated_at` as local `YYYY/MM/DD HH:MM`; empty when unparsable.
    pub updated_label: String,
    pub is_active: bool,
}

/// Returns the visible notes for `filter` and `search_term`, ordered
/// pinned-first then most-recently-updated-first.
pub fn visible_notes<'a>(notes: &'a [Note], filter: FilterMode, search_term: &str) -> Vec<&'a Note> {
    let term = search_term.trim().to_lowercase();
    let mut visible = notes
        .iter()
        .filter(|note| matches_filter(note, filter))
        .filter(|note| matches_search(note, &term))
        .collect::<Vec<_>>();
    visible.sort_by(|a, b| compare_for_list(a, b));
    visible
}

/// Ordering used by the note list.
pub fn compare_for_list(a: &Note, b: &Note) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

/// Builds the list-item projection for one note.
pub fn list_item(note: &Note, active_id: Option<&str>) -> NoteListItem {
    let display_title = if note.title.is_empty() {
        UNTITLED_LABEL.to_string()
    } else {
        note.title.clone()
    };
    let snippet = note
        .content
        .lines()
        .next()
        .filter(|line| !line.is_empty())
        .unwrap_or(EMPTY_SNIPPET)
        .to_string();

    NoteListItem {
        id: note.id.clone(),
        display_title,
        snippet,
        pinned: note.pinned,
        updated_at: note.updated_at.clone(),
        updated_label: format_display_date(&note.updated_at),
        is_active: active_id == Some(note.id.as_str()),
    }
}

/// Renders an ISO-8601 timestamp as local `YYYY/MM/DD HH:MM`.
///
/// Unparsable input renders as an empty string.
pub fn format_display_date(iso: &str) -> String {
    format_display_date_in(iso, &Local)
}

fn format_display_date_in<Tz: TimeZone>(iso: &str, zone: &Tz) -> String
where
    Tz::Offset: Display,
{
    DateTime::parse_from_rfc3339(iso)
        .map(|value| value.with_timezone(zone).format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn matches_filter(note: &Note, filter: FilterMode) -> bool {
    match filter {
        FilterMode::All => true,
        FilterMode::Pinned => note.pinned,
    }
}

/// `term` must already be trimmed and lowercased.
fn matches_search(note: &Note, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(term)
        || note.content.to_lowercase().contains(term)
        || note.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

#[cfg(test)]
mod tests {
    use super::{
        format_display_date, format_display_date_in, list_item, FilterMode, EMPTY_SNIPPET,
        UNTITLED_LABEL,
    };
    use crate::clock::SteppingClock;
    use crate::model::note::Note;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn filter_mode_parses_case_insensitively() {
        assert_eq!("PINNED".parse::<FilterMode>().unwrap(), FilterMode::Pinned);
        assert!("starred".parse::<FilterMode>().is_err());
    }

    #[test]
    fn list_item_uses_fallback_labels() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let mut note = Note::new(&clock);
        note.title.clear();
        let item = list_item(&note, Some(note.id.as_str()));
        assert_eq!(item.display_title, UNTITLED_LABEL);
        assert_eq!(item.snippet, EMPTY_SNIPPET);
        assert!(item.is_active);
    }

    #[test]
    fn list_item_snippet_is_first_line() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let mut note = Note::new(&clock);
        note.content = "milk\neggs".to_string();
        assert_eq!(list_item(&note, None).snippet, "milk");
    }

    #[test]
    fn display_date_uses_minute_precision_in_zone() {
        assert_eq!(
            format_display_date_in("2024-03-07T09:05:59.999Z", &Utc),
            "2024/03/07 09:05"
        );
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            format_display_date_in("2024-03-07T20:30:00.000Z", &tokyo),
            "2024/03/08 05:30"
        );
    }

    #[test]
    fn unparsable_date_renders_empty() {
        assert_eq!(format_display_date("yesterday"), "");
        assert_eq!(format_display_date(""), "");
    }

    #[test]
    fn list_item_carries_display_date() {
        let clock = SteppingClock::starting_at_epoch_2024();
        let mut note = Note::new(&clock);
        note.updated_at = "not a date".to_string();
        assert_eq!(list_item(&note, None).updated_label, "");
    }
}
