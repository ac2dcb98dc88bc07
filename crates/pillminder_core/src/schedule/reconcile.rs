//! Slot reconciliation.
//!
//! # Responsibility
//! - Map medications and today's dose events onto ordered schedule slots.
//!
//! # Invariants
//! - Pure: output depends only on the inputs, never on the clock.
//! - Only `Frequency::Daily` medications produce slots.
//! - Output is ascending by time of day; equal times keep medication input
//!   order.
//! - A taken event linked to a scheduled `slot_time` marks that slot. Every
//!   other taken event fills the earliest still-untaken slot of its
//!   medication, so extra doses mark all slots and never error.

use crate::model::dose::DoseEvent;
use crate::model::medication::{Medication, MedicationId};
use crate::model::time_of_day::TimeOfDay;
use std::fmt::{Display, Formatter};

/// Identity of one expected daily dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub medication_id: MedicationId,
    pub time: TimeOfDay,
}

impl Display for SlotKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.medication_id, self.time)
    }
}

/// One schedule slot with its reconciled status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus<'a> {
    pub medication: &'a Medication,
    pub time: TimeOfDay,
    pub taken: bool,
}

impl SlotStatus<'_> {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            medication_id: self.medication.id,
            time: self.time,
        }
    }
}

/// Builds today's slot list.
///
/// `today_events` must already be filtered to the caller's local day.
pub fn reconcile_slots<'a>(
    medications: &'a [Medication],
    today_events: &[DoseEvent],
) -> Vec<SlotStatus<'a>> {
    let mut slots = Vec::new();

    for medication in medications.iter().filter(|medication| medication.is_scheduled()) {
        let times = medication.sorted_times();
        let taken = taken_flags(medication.id, &times, today_events);
        slots.extend(
            times
                .into_iter()
                .zip(taken)
                .map(|(time, taken)| SlotStatus {
                    medication,
                    time,
                    taken,
                }),
        );
    }

    // Stable: equal times keep medication order.
    slots.sort_by_key(|slot| slot.time);
    slots
}

fn taken_flags(
    medication_id: MedicationId,
    times: &[TimeOfDay],
    today_events: &[DoseEvent],
) -> Vec<bool> {
    let mut flags = vec![false; times.len()];
    let mut unlinked = 0usize;

    for event in today_events
        .iter()
        .filter(|event| event.medication_id == medication_id && event.is_taken())
    {
        let linked = event
            .slot_time
            .and_then(|slot| times.binary_search(&slot).ok())
            .filter(|idx| !flags[*idx]);
        match linked {
            Some(idx) => flags[idx] = true,
            None => unlinked += 1,
        }
    }

    for flag in flags.iter_mut().filter(|flag| !**flag).take(unlinked) {
        *flag = true;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::{reconcile_slots, taken_flags};
    use crate::model::dose::DoseEvent;
    use crate::model::medication::{Frequency, Medication};
    use crate::model::time_of_day::TimeOfDay;
    use crate::time::LocalInstant;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn t(raw: &str) -> TimeOfDay {
        raw.parse().unwrap()
    }

    fn at() -> LocalInstant {
        let local = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        LocalInstant::from_datetime(&local.and_utc())
    }

    #[test]
    fn linked_event_marks_its_own_slot() {
        let id = Uuid::new_v4();
        let times = [t("08:00"), t("20:00")];
        let events = [DoseEvent::taken(id, Some(t("20:00")), at())];
        assert_eq!(taken_flags(id, &times, &events), vec![false, true]);
    }

    #[test]
    fn unlinked_events_fill_remaining_slots_in_order() {
        let id = Uuid::new_v4();
        let times = [t("08:00"), t("13:00"), t("20:00")];
        let events = [
            DoseEvent::taken(id, Some(t("13:00")), at()),
            DoseEvent::taken(id, None, at()),
        ];
        assert_eq!(taken_flags(id, &times, &events), vec![true, true, false]);
    }

    #[test]
    fn duplicate_or_unknown_links_count_positionally() {
        let id = Uuid::new_v4();
        let times = [t("08:00"), t("20:00")];
        let events = [
            DoseEvent::taken(id, Some(t("20:00")), at()),
            DoseEvent::taken(id, Some(t("20:00")), at()),
        ];
        assert_eq!(taken_flags(id, &times, &events), vec![true, true]);

        let unknown = [DoseEvent::taken(id, Some(t("12:00")), at())];
        assert_eq!(taken_flags(id, &times, &unknown), vec![true, false]);
    }

    #[test]
    fn skipped_and_foreign_events_are_ignored() {
        let id = Uuid::new_v4();
        let times = [t("08:00")];
        let events = [
            DoseEvent::skipped(id, None, at()),
            DoseEvent::taken(Uuid::new_v4(), None, at()),
        ];
        assert_eq!(taken_flags(id, &times, &events), vec![false]);
    }

    #[test]
    fn equal_times_keep_medication_order() {
        let first = Medication::new("First", "", Frequency::Daily, vec![t("09:00")]);
        let second = Medication::new("Second", "", Frequency::Daily, vec![t("07:00"), t("09:00")]);
        let medications = vec![first.clone(), second.clone()];

        let slots = reconcile_slots(&medications, &[]);
        let order: Vec<(&str, String)> = slots
            .iter()
            .map(|slot| (slot.medication.name.as_str(), slot.time.to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Second", "07:00".to_string()),
                ("First", "09:00".to_string()),
                ("Second", "09:00".to_string()),
            ]
        );
        assert_eq!(slots[1].key().to_string(), format!("{}-09:00", first.id));
    }
}
