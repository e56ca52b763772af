//! Core domain logic for memo, a local note-taking store.
//! This crate is the single source of truth for note invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod query;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod transfer;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::MemoConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::normalize::{ensure_unique_ids, normalize_record, normalize_records};
pub use model::note::{Note, NoteChange, NoteId, PLACEHOLDER_TITLE};
pub use persistence::gateway::{NoteGateway, Theme, NOTES_SLOT_KEY, THEME_SLOT_KEY};
pub use persistence::kv::{KvStorage, MemoryKvStorage, StorageError, StorageResult};
pub use persistence::sqlite_kv::SqliteKvStorage;
pub use query::visible::{format_display_date, list_item, visible_notes, FilterMode, NoteListItem};
pub use scheduler::{Debouncer, ManualScheduler, SaveScheduler, DEFAULT_SAVE_DELAY};
pub use service::session::{MemoSession, PendingImport, SaveStatus};
pub use store::note_store::{InsertPosition, NoteStore, StoreError, StoreResult};
pub use transfer::codec::{export_all, export_file_name, import_all, TransferError, TransferResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
