//! Core domain logic for pillminder.
//! This crate owns medication schedules, dose reconciliation and the
//! reminder engine; UI callers go through `service` and `reminder`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod time;

pub use config::{ConfigError, ReminderConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::dose::{DoseEvent, DoseEventId, DoseStatus};
pub use model::medication::{Frequency, Medication, MedicationId, MedicationValidationError};
pub use model::time_of_day::{TimeOfDay, TimeOfDayError};
pub use reminder::engine::{FiredReminder, ReminderClock, TickOutcome};
pub use reminder::ledger::{NotificationLedger, NOTIFICATION_LEDGER_KEY};
pub use reminder::policy::{evaluate_slot, ReminderKind};
pub use reminder::runner::ReminderHandle;
pub use reminder::sink::{FallbackSink, LogSink, NotificationSink};
pub use repo::record_store::{
    DoseEventQuery, MedicationRepository, RecordStore, RepoError, RepoResult, SqliteRecordStore,
};
pub use repo::state_store::{KeyValueStore, SqliteKeyValueStore};
pub use schedule::reconcile::{reconcile_slots, SlotKey, SlotStatus};
pub use service::medication_service::{
    MedicationService, NewMedication, ScheduleEntry, ServiceError, ServiceResult,
};
pub use time::{Clock, LocalInstant, ManualClock, SystemClock};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
