//! Domain model for medication schedules and dose logs.
//!
//! # Responsibility
//! - Define canonical data structures used by the core scheduling logic.
//!
//! # Invariants
//! - Medications and dose events are identified by stable UUIDs.
//! - Dose events are append-only; nothing in core rewrites them.

pub mod dose;
pub mod medication;
pub mod time_of_day;
