use chrono::NaiveDate;
use pillminder_core::{
    reconcile_slots, DoseEvent, Frequency, LocalInstant, Medication, TimeOfDay,
};

#[test]
fn repeated_calls_return_identical_sequences() {
    let morning = daily("Metformin", &["20:00", "08:00"]);
    let noon = daily("Vitamin D", &["12:00"]);
    let medications = vec![morning.clone(), noon];
    let events = vec![DoseEvent::taken(morning.id, None, at(9, 0))];

    let first = reconcile_slots(&medications, &events);
    let second = reconcile_slots(&medications, &events);
    assert_eq!(first, second);
    assert_eq!(
        summary(&first),
        vec![
            ("Metformin", "08:00".to_string(), true),
            ("Vitamin D", "12:00".to_string(), false),
            ("Metformin", "20:00".to_string(), false),
        ]
    );
}

#[test]
fn taken_count_marks_earliest_slots_first() {
    let med = daily("Metformin", &["08:00", "20:00"]);
    let medications = vec![med.clone()];

    let none = reconcile_slots(&medications, &[]);
    assert_eq!(taken(&none), vec![false, false]);

    let one = vec![DoseEvent::taken(med.id, None, at(21, 0))];
    assert_eq!(taken(&reconcile_slots(&medications, &one)), vec![true, false]);

    let three = vec![
        DoseEvent::taken(med.id, None, at(8, 0)),
        DoseEvent::taken(med.id, None, at(20, 0)),
        DoseEvent::taken(med.id, None, at(21, 0)),
    ];
    assert_eq!(
        taken(&reconcile_slots(&medications, &three)),
        vec![true, true]
    );
}

#[test]
fn store_order_of_times_does_not_matter() {
    let med = daily("Metformin", &["20:00", "08:00"]);
    let medications = vec![med.clone()];
    let events = vec![DoseEvent::taken(med.id, None, at(9, 0))];

    let slots = reconcile_slots(&medications, &events);
    assert_eq!(slots[0].time, t("08:00"));
    assert!(slots[0].taken);
    assert_eq!(slots[1].time, t("20:00"));
    assert!(!slots[1].taken);
}

#[test]
fn as_needed_medications_produce_no_slots() {
    let mut med = daily("Ibuprofen", &["08:00", "14:00"]);
    med.frequency = Frequency::AsNeeded;
    let events = vec![DoseEvent::taken(med.id, None, at(9, 0))];

    assert!(reconcile_slots(&[med], &events).is_empty());
}

#[test]
fn empty_inputs_yield_empty_schedule() {
    assert!(reconcile_slots(&[], &[]).is_empty());
}

#[test]
fn skipped_doses_do_not_mark_slots() {
    let med = daily("Metformin", &["08:00"]);
    let events = vec![DoseEvent::skipped(med.id, None, at(8, 5))];
    let medications = vec![med];

    assert_eq!(taken(&reconcile_slots(&medications, &events)), vec![false]);
}

#[test]
fn dose_linked_to_later_slot_leaves_earlier_slot_open() {
    let med = daily("Metformin", &["08:00", "20:00"]);
    let events = vec![DoseEvent::taken(med.id, Some(t("20:00")), at(7, 30))];
    let medications = vec![med];

    assert_eq!(
        taken(&reconcile_slots(&medications, &events)),
        vec![false, true]
    );
}

fn daily(name: &str, times: &[&str]) -> Medication {
    Medication::new(
        name,
        "1 tablet",
        Frequency::Daily,
        times.iter().map(|raw| t(raw)).collect(),
    )
}

fn t(raw: &str) -> TimeOfDay {
    raw.parse().unwrap()
}

fn at(hour: u32, minute: u32) -> LocalInstant {
    let local = NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap();
    LocalInstant::from_datetime(&local.and_utc())
}

fn taken(slots: &[pillminder_core::SlotStatus<'_>]) -> Vec<bool> {
    slots.iter().map(|slot| slot.taken).collect()
}

fn summary<'a>(slots: &[pillminder_core::SlotStatus<'a>]) -> Vec<(&'a str, String, bool)> {
    slots
        .iter()
        .map(|slot| (slot.medication.name.as_str(), slot.time.to_string(), slot.taken))
        .collect()
}
