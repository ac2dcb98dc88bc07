//! Per-slot reminder timing policy.
//!
//! # Invariants
//! - `delta = now - scheduled` in whole minutes of the local day; there is
//!   no wrap across midnight.
//! - A slot with no ledger entry always passes the gap check.
//! - Gap checks are strict: exactly the configured gap does not fire.

use crate::config::ReminderConfig;
use crate::model::medication::Medication;
use crate::model::time_of_day::TimeOfDay;
use crate::time::LocalInstant;

/// Which reminder a slot is due for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    /// "Time to take" alert around the scheduled minute.
    Primary,
    /// Follow-up when the dose is still unmarked after the retry offset.
    Retry,
}

impl ReminderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Retry => "retry",
        }
    }

    /// Notification title and body for `medication`.
    pub fn compose(self, medication: &Medication) -> (String, String) {
        match self {
            Self::Primary => (
                format!("Time to take {}", medication.name),
                format!("Dosage: {}", medication.dosage),
            ),
            Self::Retry => (
                format!("Reminder: {}", medication.name),
                format!("You haven't marked {} as taken yet!", medication.name),
            ),
        }
    }
}

/// Decides whether an untaken slot needs a reminder at `now`.
pub fn evaluate_slot(
    config: &ReminderConfig,
    now: LocalInstant,
    scheduled: TimeOfDay,
    last_notified_ms: Option<i64>,
) -> Option<ReminderKind> {
    let delta = now.minutes_since_midnight() - scheduled.minutes_since_midnight();
    let gap_exceeds = |min_gap_ms: i64| match last_notified_ms {
        None => true,
        Some(last) => now.epoch_ms.saturating_sub(last) > min_gap_ms,
    };

    if delta.abs() <= config.primary_window_minutes && gap_exceeds(config.primary_min_gap_ms()) {
        return Some(ReminderKind::Primary);
    }
    if delta == config.retry_after_minutes && gap_exceeds(config.retry_min_gap_ms()) {
        return Some(ReminderKind::Retry);
    }
    None
}
