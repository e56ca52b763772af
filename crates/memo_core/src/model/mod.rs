//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its edit operations.
//! - Normalize loosely-shaped external records into valid notes.
//!
//! # Invariants
//! - Every note is identified by a stable, collection-unique `NoteId`.
//! - `created_at` is set once; `updated_at` never sorts before it.

pub mod normalize;
pub mod note;
