//! Medication domain model.
//!
//! # Responsibility
//! - Define the recurring schedule definition owned by the record store.
//! - Validate definitions before they are persisted.
//!
//! # Invariants
//! - `id` is stable and never reused for another medication.
//! - Only `Frequency::Daily` medications produce schedule slots.
//! - `times` is semantically a set; storage order carries no meaning.

use crate::model::time_of_day::TimeOfDay;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a medication definition.
pub type MedicationId = Uuid;

/// How a medication is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Taken at every listed time of day.
    Daily,
    /// Taken on demand; never scheduled or reminded.
    AsNeeded,
}

impl Frequency {
    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::AsNeeded => "AsNeeded",
        }
    }

    /// Parses a stored frequency value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Daily" => Some(Self::Daily),
            "AsNeeded" => Some(Self::AsNeeded),
            _ => None,
        }
    }
}

/// Recurring medication schedule definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    /// Daily times of day, in whatever order the store returns them.
    pub times: Vec<TimeOfDay>,
    /// Optional display hint for UI callers.
    pub color: Option<String>,
}

/// Validation failures for medication definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedicationValidationError {
    EmptyName,
    DuplicateTime(TimeOfDay),
    MissingScheduleTimes,
}

impl Display for MedicationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "medication name must not be empty"),
            Self::DuplicateTime(time) => write!(f, "schedule time {time} is listed twice"),
            Self::MissingScheduleTimes => {
                write!(f, "daily medication needs at least one schedule time")
            }
        }
    }
}

impl Error for MedicationValidationError {}

impl Medication {
    /// Creates a medication with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: Frequency,
        times: Vec<TimeOfDay>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, dosage, frequency, times)
    }

    /// Creates a medication with a caller-provided id.
    pub fn with_id(
        id: MedicationId,
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: Frequency,
        times: Vec<TimeOfDay>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            dosage: dosage.into(),
            frequency,
            times,
            color: None,
        }
    }

    /// Whether this medication participates in daily scheduling.
    pub fn is_scheduled(&self) -> bool {
        self.frequency == Frequency::Daily
    }

    /// Schedule times ascending, with duplicates collapsed.
    pub fn sorted_times(&self) -> Vec<TimeOfDay> {
        let mut times = self.times.clone();
        times.sort_unstable();
        times.dedup();
        times
    }

    /// Checks write-side invariants.
    ///
    /// Read paths call this too, so corrupted rows surface as errors.
    pub fn validate(&self) -> Result<(), MedicationValidationError> {
        if self.name.trim().is_empty() {
            return Err(MedicationValidationError::EmptyName);
        }

        let sorted = {
            let mut times = self.times.clone();
            times.sort_unstable();
            times
        };
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(MedicationValidationError::DuplicateTime(pair[0]));
        }

        if self.frequency == Frequency::Daily && self.times.is_empty() {
            return Err(MedicationValidationError::MissingScheduleTimes);
        }

        Ok(())
    }
}
