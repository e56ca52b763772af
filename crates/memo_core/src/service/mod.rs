//! Session-level use-case orchestration.
//!
//! # Responsibility
//! - Bind store, query, persistence and transfer into user intents.
//! - Keep UI/CLI hosts decoupled from storage and timing details.

pub mod session;
