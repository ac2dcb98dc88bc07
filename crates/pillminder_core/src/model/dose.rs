//! Dose event model.
//!
//! # Responsibility
//! - Represent the append-only log of doses taken or skipped.
//!
//! # Invariants
//! - `date` is the local calendar day the dose counts toward.
//! - Only `DoseStatus::Taken` events affect slot reconciliation.

use crate::model::medication::MedicationId;
use crate::model::time_of_day::TimeOfDay;
use crate::time::LocalInstant;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one dose event.
pub type DoseEventId = Uuid;

/// Outcome recorded for a dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Taken,
    /// Reserved; recorded but ignored by reconciliation.
    Skipped,
}

impl DoseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Taken => "taken",
            Self::Skipped => "skipped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "taken" => Some(Self::Taken),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

/// One recorded dose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseEvent {
    pub id: DoseEventId,
    pub medication_id: MedicationId,
    /// Unix epoch milliseconds when the event was recorded.
    pub recorded_at_ms: i64,
    pub date: NaiveDate,
    pub status: DoseStatus,
    /// Schedule slot this dose was taken for, when the caller knows it.
    ///
    /// Events without a slot are matched positionally.
    pub slot_time: Option<TimeOfDay>,
}

impl DoseEvent {
    /// Creates an event stamped with `at`'s instant and local day.
    pub fn new(
        medication_id: MedicationId,
        status: DoseStatus,
        slot_time: Option<TimeOfDay>,
        at: LocalInstant,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            medication_id,
            recorded_at_ms: at.epoch_ms,
            date: at.date(),
            status,
            slot_time,
        }
    }

    pub fn taken(
        medication_id: MedicationId,
        slot_time: Option<TimeOfDay>,
        at: LocalInstant,
    ) -> Self {
        Self::new(medication_id, DoseStatus::Taken, slot_time, at)
    }

    pub fn skipped(
        medication_id: MedicationId,
        slot_time: Option<TimeOfDay>,
        at: LocalInstant,
    ) -> Self {
        Self::new(medication_id, DoseStatus::Skipped, slot_time, at)
    }

    pub fn is_taken(&self) -> bool {
        self.status == DoseStatus::Taken
    }
}
