//! Daily schedule derivation.
//!
//! # Responsibility
//! - Expand medication definitions into per-slot taken/untaken status.

pub mod reconcile;
