use chrono::{Duration, NaiveDate};
use pillminder_core::db::open_db_in_memory;
use pillminder_core::{
    DoseEvent, DoseEventQuery, DoseStatus, Frequency, LocalInstant, Medication,
    MedicationRepository, RecordStore, RepoError, SqliteRecordStore, TimeOfDay,
};

#[test]
fn save_and_get_roundtrip() {
    let store = new_store();
    let mut med = daily("Metformin", &["20:00", "08:00"]);
    med.color = Some("#3366ff".to_string());
    store.save_medication(&med).unwrap();

    let loaded = store.get_medication(med.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Metformin");
    assert_eq!(loaded.dosage, "500mg");
    assert_eq!(loaded.frequency, Frequency::Daily);
    assert_eq!(loaded.color.as_deref(), Some("#3366ff"));
    assert_eq!(loaded.sorted_times(), vec![t("08:00"), t("20:00")]);
}

#[test]
fn save_existing_medication_replaces_schedule() {
    let store = new_store();
    let mut med = daily("Metformin", &["08:00", "20:00"]);
    store.save_medication(&med).unwrap();

    med.name = "Metformin XR".to_string();
    med.times = vec![t("07:30")];
    store.save_medication(&med).unwrap();

    let all = store.list_medications().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Metformin XR");
    assert_eq!(all[0].times, vec![t("07:30")]);
}

#[test]
fn invalid_medication_is_not_persisted() {
    let store = new_store();
    let med = daily("   ", &["08:00"]);

    let err = store.save_medication(&med).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(store.list_medications().unwrap().is_empty());
}

#[test]
fn list_medications_keeps_insertion_order_and_times() {
    let store = new_store();
    let first = daily("A", &["09:00"]);
    let second = daily("B", &["07:00", "21:00"]);
    let mut third = daily("C", &[]);
    third.frequency = Frequency::AsNeeded;
    store.save_medication(&first).unwrap();
    store.save_medication(&second).unwrap();
    store.save_medication(&third).unwrap();
    store
        .connection()
        .execute_batch(&format!(
            "UPDATE medications SET created_at = 1 WHERE id = '{}';
             UPDATE medications SET created_at = 2 WHERE id = '{}';
             UPDATE medications SET created_at = 3 WHERE id = '{}';",
            first.id, second.id, third.id
        ))
        .unwrap();

    let listed = store.list_medications().unwrap();
    let names: Vec<&str> = listed.iter().map(|med| med.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(listed[1].sorted_times(), vec![t("07:00"), t("21:00")]);
    assert!(listed[2].times.is_empty());
}

#[test]
fn delete_removes_medication_but_keeps_history() {
    let store = new_store();
    let med = daily("Metformin", &["08:00"]);
    store.save_medication(&med).unwrap();
    store
        .append_dose_event(&DoseEvent::taken(med.id, None, at(8, 0)))
        .unwrap();

    store.delete_medication(med.id).unwrap();
    assert!(store.get_medication(med.id).unwrap().is_none());
    assert_eq!(
        store
            .list_dose_events(&DoseEventQuery::default())
            .unwrap()
            .len(),
        1
    );

    let err = store.delete_medication(med.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == med.id));
}

#[test]
fn today_events_are_filtered_by_local_day() {
    let store = new_store();
    let med = daily("Metformin", &["08:00"]);
    store.save_medication(&med).unwrap();

    let today = at(8, 0);
    let yesterday = today.plus(Duration::days(-1));
    let linked = DoseEvent::taken(med.id, Some(t("08:00")), today);
    store.append_dose_event(&linked).unwrap();
    store
        .append_dose_event(&DoseEvent::skipped(med.id, None, yesterday))
        .unwrap();

    let events = store.list_today_dose_events(today.date()).unwrap();
    assert_eq!(events, vec![linked]);
    assert_eq!(
        store
            .list_today_dose_events(yesterday.date())
            .unwrap()
            .into_iter()
            .map(|event| event.status)
            .collect::<Vec<_>>(),
        vec![DoseStatus::Skipped]
    );
}

#[test]
fn dose_history_is_newest_first_with_filters() {
    let store = new_store();
    let first = daily("A", &["08:00"]);
    let second = daily("B", &["09:00"]);
    store.save_medication(&first).unwrap();
    store.save_medication(&second).unwrap();

    store
        .append_dose_event(&DoseEvent::taken(first.id, None, at(8, 0)))
        .unwrap();
    store
        .append_dose_event(&DoseEvent::taken(second.id, None, at(9, 0)))
        .unwrap();
    store
        .append_dose_event(&DoseEvent::taken(first.id, None, at(10, 0)))
        .unwrap();

    let latest_two = store
        .list_dose_events(&DoseEventQuery {
            limit: Some(2),
            ..DoseEventQuery::default()
        })
        .unwrap();
    let stamps: Vec<i64> = latest_two.iter().map(|event| event.recorded_at_ms).collect();
    assert_eq!(stamps, vec![at(10, 0).epoch_ms, at(9, 0).epoch_ms]);

    let only_first = store
        .list_dose_events(&DoseEventQuery {
            medication_id: Some(first.id),
            limit: None,
        })
        .unwrap();
    assert_eq!(only_first.len(), 2);
    assert!(only_first.iter().all(|event| event.medication_id == first.id));
}

#[test]
fn corrupted_rows_surface_as_invalid_data() {
    let store = new_store();
    store
        .connection()
        .execute_batch(
            "INSERT INTO dose_events (id, medication_id, recorded_at, dose_date, status)
             VALUES ('not-a-uuid', 'also-bad', 0, '2026-03-02', 'taken');",
        )
        .unwrap();

    let err = store
        .list_today_dose_events(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

fn new_store() -> SqliteRecordStore {
    SqliteRecordStore::new(open_db_in_memory().unwrap())
}

fn daily(name: &str, times: &[&str]) -> Medication {
    Medication::new(
        name,
        "500mg",
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
