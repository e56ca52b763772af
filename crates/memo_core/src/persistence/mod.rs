//! Durable key-value slots and the note persistence gateway.
//!
//! # Responsibility
//! - Abstract durable key-value storage behind [`kv::KvStorage`].
//! - Serialize/normalize the note collection and theme preference.
//!
//! # Invariants
//! - Loading never fails; unreadable slots read as empty.
//! - Save failures are reported, never retried, and never touch memory state.

pub mod gateway;
pub mod kv;
pub mod sqlite_kv;
