//! Medication use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for UI callers: manage medications, read
//!   today's schedule, and record doses.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - `today_schedule` always re-reads the store.
//! - A dose linked to a slot must name one of the medication's daily times.

use crate::model::dose::{DoseEvent, DoseStatus};
use crate::model::medication::{Frequency, Medication, MedicationId};
use crate::model::time_of_day::TimeOfDay;
use crate::repo::record_store::{DoseEventQuery, MedicationRepository, RepoError};
use crate::schedule::reconcile::reconcile_slots;
use crate::time::LocalInstant;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for medication use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target medication does not exist.
    MedicationNotFound(MedicationId),
    /// Dose names a time that is not on the medication's daily schedule.
    UnknownSlot {
        medication_id: MedicationId,
        time: TimeOfDay,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MedicationNotFound(id) => write!(f, "medication not found: {id}"),
            Self::UnknownSlot {
                medication_id,
                time,
            } => write!(
                f,
                "medication {medication_id} has no daily dose scheduled at {time}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::MedicationNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Input for creating a medication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    /// Any order; stored ascending.
    pub times: Vec<TimeOfDay>,
    pub color: Option<String>,
}

/// Owned row of today's schedule for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub medication_id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub time: TimeOfDay,
    pub taken: bool,
}

/// Use-case facade over a medication repository.
pub struct MedicationService<R: MedicationRepository> {
    repo: R,
}

impl<R: MedicationRepository> MedicationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Creates and persists a medication with a new id.
    pub fn add_medication(&self, input: NewMedication) -> ServiceResult<Medication> {
        let mut times = input.times;
        times.sort_unstable();

        let mut medication = Medication::new(
            input.name.trim(),
            input.dosage.trim(),
            input.frequency,
            times,
        );
        medication.color = input.color;
        self.repo.save_medication(&medication)?;

        info!(
            "event=medication_add module=service status=ok frequency={} times={}",
            medication.frequency.as_str(),
            medication.times.len()
        );
        Ok(medication)
    }

    /// Replaces an existing medication definition.
    pub fn update_medication(&self, medication: &Medication) -> ServiceResult<()> {
        if self.repo.get_medication(medication.id)?.is_none() {
            return Err(ServiceError::MedicationNotFound(medication.id));
        }
        self.repo.save_medication(medication)?;
        Ok(())
    }

    /// Deletes a medication; its dose history is kept.
    pub fn delete_medication(&self, id: MedicationId) -> ServiceResult<()> {
        self.repo.delete_medication(id)?;
        Ok(())
    }

    pub fn get_medication(&self, id: MedicationId) -> ServiceResult<Option<Medication>> {
        Ok(self.repo.get_medication(id)?)
    }

    pub fn list_medications(&self) -> ServiceResult<Vec<Medication>> {
        Ok(self.repo.list_medications()?)
    }

    /// Reconciled schedule for `today`, ascending by time.
    pub fn today_schedule(&self, today: NaiveDate) -> ServiceResult<Vec<ScheduleEntry>> {
        let medications = self.repo.list_medications()?;
        let events = self.repo.list_today_dose_events(today)?;

        Ok(reconcile_slots(&medications, &events)
            .into_iter()
            .map(|slot| ScheduleEntry {
                medication_id: slot.medication.id,
                name: slot.medication.name.clone(),
                dosage: slot.medication.dosage.clone(),
                time: slot.time,
                taken: slot.taken,
            })
            .collect())
    }

    /// Appends one dose event stamped at `at`.
    pub fn record_dose(
        &self,
        medication_id: MedicationId,
        slot_time: Option<TimeOfDay>,
        status: DoseStatus,
        at: LocalInstant,
    ) -> ServiceResult<DoseEvent> {
        let medication = self
            .repo
            .get_medication(medication_id)?
            .ok_or(ServiceError::MedicationNotFound(medication_id))?;

        if let Some(time) = slot_time {
            if !medication.is_scheduled() || !medication.times.contains(&time) {
                return Err(ServiceError::UnknownSlot {
                    medication_id,
                    time,
                });
            }
        }

        let event = DoseEvent::new(medication_id, status, slot_time, at);
        self.repo.append_dose_event(&event)?;
        info!(
            "event=dose_record module=service status=ok dose_status={} linked_slot={}",
            status.as_str(),
            slot_time.is_some()
        );
        Ok(event)
    }

    pub fn mark_taken(
        &self,
        medication_id: MedicationId,
        slot_time: Option<TimeOfDay>,
        at: LocalInstant,
    ) -> ServiceResult<DoseEvent> {
        self.record_dose(medication_id, slot_time, DoseStatus::Taken, at)
    }

    pub fn mark_skipped(
        &self,
        medication_id: MedicationId,
        slot_time: Option<TimeOfDay>,
        at: LocalInstant,
    ) -> ServiceResult<DoseEvent> {
        self.record_dose(medication_id, slot_time, DoseStatus::Skipped, at)
    }

    /// Dose history, newest first.
    pub fn dose_history(&self, query: &DoseEventQuery) -> ServiceResult<Vec<DoseEvent>> {
        Ok(self.repo.list_dose_events(query)?)
    }
}
