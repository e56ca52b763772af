//! Visible-list derivation.
//!
//! # Responsibility
//! - Filter, search and order notes for list rendering.
//! - Shape lightweight list-item projections.

pub mod visible;
