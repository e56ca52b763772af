//! Lenient record normalization for stored and imported documents.
//!
//! # Responsibility
//! - Turn any JSON value into a valid [`Note`], filling defaults.
//! - Keep ids unique across one normalized batch.
//!
//! # Invariants
//! - Normalization never fails; malformed fields are replaced, not rejected.
//! - Output notes satisfy `updated_at >= created_at`.

use crate::clock::Clock;
use crate::model::note::{generate_note_id, Note, PLACEHOLDER_TITLE};
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Normalizes one loosely-shaped record.
///
/// Non-object values are treated as an empty object, so every field falls
/// back to its default.
pub fn normalize_record(value: &Value, clock: &dyn Clock) -> Note {
    let empty = Map::new();
    let record = value.as_object().unwrap_or(&empty);

    let id = non_empty_string(record.get("id")).unwrap_or_else(generate_note_id);
    let title = record
        .get("title")
        .and_then(Value::as_str)
        .map_or_else(|| PLACEHOLDER_TITLE.to_string(), str::to_string);
    let content = record
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let tags = record.get("tags").map(normalize_tags).unwrap_or_default();
    let pinned = record.get("pinned").is_some_and(is_truthy);

    let created_at = non_empty_string(record.get("createdAt")).unwrap_or_else(|| clock.now_iso());
    let mut updated_at =
        non_empty_string(record.get("updatedAt")).unwrap_or_else(|| clock.now_iso());
    if updated_at < created_at {
        updated_at = created_at.clone();
    }

    Note {
        id,
        title,
        content,
        tags,
        pinned,
        created_at,
        updated_at,
    }
}

/// Normalizes a batch of records, regenerating ids already used earlier in
/// the batch.
pub fn normalize_records(values: &[Value], clock: &dyn Clock) -> Vec<Note> {
    let mut notes = values
        .iter()
        .map(|value| normalize_record(value, clock))
        .collect::<Vec<_>>();
    ensure_unique_ids(&mut notes);
    notes
}

/// Gives a fresh id to every note whose id appeared earlier in `notes`.
///
/// Returns how many ids were regenerated.
pub fn ensure_unique_ids(notes: &mut [Note]) -> usize {
    let mut seen = HashSet::with_capacity(notes.len());
    let mut repaired = 0;
    for note in notes.iter_mut() {
        if seen.insert(note.id.clone()) {
            continue;
        }
        repaired += 1;
        note.id = generate_note_id();
        while !seen.insert(note.id.clone()) {
            note.id = generate_note_id();
        }
    }
    if repaired > 0 {
        debug!("event=duplicate_ids module=model status=repaired count={repaired}");
    }
    repaired
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn normalize_tags(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for tag in items.iter().filter_map(Value::as_str) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Boolean coercion for the `pinned` flag.
///
/// `false`, `null`, zero, NaN-like numbers and the empty string are falsy;
/// every other value (including arrays and objects) is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
