//! JSON backup export and import.
//!
//! # Responsibility
//! - Encode the full collection as a pretty-printed backup document.
//! - Decode and normalize externally supplied backup documents.

pub mod codec;
