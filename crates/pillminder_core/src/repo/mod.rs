//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract the reminder engine reads from.
//! - Define key/value state storage for engine-owned records.
//! - Isolate SQLite query details from service and engine orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidData`) in
//!   addition to DB transport errors.

pub mod record_store;
pub mod state_store;
