//! Reminder scheduling engine.
//!
//! # Responsibility
//! - Decide, on every tick, which untaken slots need a first or retry alert.
//! - Suppress duplicates through a persisted notification ledger.
//! - Run ticks on a single background worker with explicit start/stop.
//!
//! # Invariants
//! - The store is re-read on every tick; nothing is cached across ticks.
//! - Only the reminder worker mutates the ledger.

pub mod engine;
pub mod ledger;
pub mod policy;
pub mod runner;
pub mod sink;
