//! Domain model for the simple entity service.
//!
//! # Responsibility
//! - Define the persisted record type and its identifier.
//!
//! # Invariants
//! - A saved `SimpleModel` always carries a non-nil `SimpleModelId`.
//! - Deletion is a hard delete; there are no tombstone rows.

pub mod simple_model;
