//! In-memory note collection.
//!
//! # Responsibility
//! - Own the ordered note list and the active note selection.
//! - Enforce collection-level invariants on every mutation.
//!
//! # Invariants
//! - Note ids are unique within one store.
//! - After bootstrap, the store never becomes empty.

pub mod note_store;
