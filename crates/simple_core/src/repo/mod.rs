//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the entity store contract used by the service layer.
//! - Isolate SQLite query details from orchestration.
//!
//! # Invariants
//! - Write paths call `SimpleModel::validate()` before persistence.
//! - A successful `save` always returns a model with `id` set.

pub mod simple_repo;
