//! Backup document codec.
//!
//! # Responsibility
//! - Export notes as a pretty-printed JSON array.
//! - Import any JSON array, normalizing each element leniently.
//! - Name backup files by calendar date.
//!
//! # Invariants
//! - Import is pure: it never touches a store; callers replace state only
//!   after an explicit confirmation.
//! - `import_all(export_all(notes))` reproduces `notes` field-for-field.

use crate::clock::Clock;
use crate::model::normalize::normalize_records;
use crate::model::note::Note;
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TransferResult<T> = Result<T, TransferError>;

/// Backup export/import failure.
#[derive(Debug)]
pub enum TransferError {
    /// Input is not valid JSON.
    Parse(serde_json::Error),
    /// Input parsed, but the top-level value is not an array.
    NotAnArray { found: &'static str },
    /// Notes could not be encoded.
    Serialize(serde_json::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "backup is not valid JSON: {err}"),
            Self::NotAnArray { found } => {
                write!(f, "backup must be a JSON array of notes, found {found}")
            }
            Self::Serialize(err) => write!(f, "failed to encode backup: {err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) | Self::Serialize(err) => Some(err),
            Self::NotAnArray { .. } => None,
        }
    }
}

/// Encodes all notes as a pretty-printed JSON array.
pub fn export_all(notes: &[Note]) -> TransferResult<String> {
    let document = serde_json::to_string_pretty(notes).map_err(TransferError::Serialize)?;
    info!(
        "event=notes_export module=transfer status=ok count={} bytes={}",
        notes.len(),
        document.len()
    );
    Ok(document)
}

/// Parses a backup document and normalizes every element.
///
/// # Errors
/// - [`TransferError::Parse`] when `json_text` is not JSON.
/// - [`TransferError::NotAnArray`] when the top-level value is not an array.
pub fn import_all(json_text: &str, clock: &dyn Clock) -> TransferResult<Vec<Note>> {
    let value = serde_json::from_str::<Value>(json_text).map_err(|err| {
        warn!(
            "event=notes_import module=transfer status=error error_code=parse_failed line={} column={}",
            err.line(),
            err.column()
        );
        TransferError::Parse(err)
    })?;

    let Value::Array(records) = value else {
        let found = json_kind(&value);
        warn!("event=notes_import module=transfer status=error error_code=not_array found={found}");
        return Err(TransferError::NotAnArray { found });
    };

    let notes = normalize_records(&records, clock);
    info!(
        "event=notes_import module=transfer status=ok count={}",
        notes.len()
    );
    Ok(notes)
}

/// Returns the backup file name for `date`: `memo-backup-YYYYMMDD.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("memo-backup-{}.json", date.format("%Y%m%d"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, json_kind};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn file_name_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "memo-backup-20240307.json");
    }

    #[test]
    fn json_kind_names_top_level_shapes() {
        assert_eq!(json_kind(&json!({})), "object");
        assert_eq!(json_kind(&json!("x")), "string");
    }
}
