//! Subcommand handlers. Each opens its own store and prints plain text.

use crate::app_config::AppConfig;
use crate::error::CliResult;
use crate::terminal_sink::TerminalSink;
use chrono::{Local, TimeZone};
use log::info;
use pillminder_core::{
    Clock, DoseEventQuery, FallbackSink, Frequency, LogSink, MedicationId, MedicationService,
    NewMedication, ReminderClock, SqliteKeyValueStore, SqliteRecordStore, SystemClock, TimeOfDay,
};
use std::thread;
use std::time::Duration;

fn open_service(config: &AppConfig) -> CliResult<MedicationService<SqliteRecordStore>> {
    Ok(MedicationService::new(SqliteRecordStore::open(
        &config.database_path,
    )?))
}

pub fn add(
    config: &AppConfig,
    name: String,
    dosage: String,
    frequency: Frequency,
    times: Vec<TimeOfDay>,
    color: Option<String>,
) -> CliResult<()> {
    let service = open_service(config)?;
    let medication = service.add_medication(NewMedication {
        name,
        dosage,
        frequency,
        times,
        color,
    })?;
    println!("{}", medication.id);
    Ok(())
}

pub fn list(config: &AppConfig) -> CliResult<()> {
    let service = open_service(config)?;
    for medication in service.list_medications()? {
        let times = medication
            .times
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{}  {}  {}  {}  {}",
            medication.id,
            medication.name,
            medication.dosage,
            medication.frequency.as_str(),
            if times.is_empty() { "-" } else { times.as_str() }
        );
    }
    Ok(())
}

pub fn remove(config: &AppConfig, id: MedicationId) -> CliResult<()> {
    open_service(config)?.delete_medication(id)?;
    Ok(())
}

pub fn today(config: &AppConfig) -> CliResult<()> {
    let service = open_service(config)?;
    let today = SystemClock.now().date();
    for entry in service.today_schedule(today)? {
        println!(
            "{}  [{}]  {} {}  ({})",
            entry.time,
            if entry.taken { "x" } else { " " },
            entry.name,
            entry.dosage,
            entry.medication_id
        );
    }
    Ok(())
}

pub fn take(config: &AppConfig, id: MedicationId, slot: Option<TimeOfDay>) -> CliResult<()> {
    let event = open_service(config)?.mark_taken(id, slot, SystemClock.now())?;
    println!("{}", event.id);
    Ok(())
}

pub fn skip(config: &AppConfig, id: MedicationId, slot: Option<TimeOfDay>) -> CliResult<()> {
    let event = open_service(config)?.mark_skipped(id, slot, SystemClock.now())?;
    println!("{}", event.id);
    Ok(())
}

pub fn history(config: &AppConfig, medication: Option<MedicationId>, limit: u32) -> CliResult<()> {
    let service = open_service(config)?;
    let events = service.dose_history(&DoseEventQuery {
        medication_id: medication,
        limit: Some(limit),
    })?;
    for event in events {
        let recorded = Local
            .timestamp_millis_opt(event.recorded_at_ms)
            .single()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| event.recorded_at_ms.to_string());
        let slot = event
            .slot_time
            .map(|time| time.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{recorded}  {}  {}  slot={slot}",
            event.status.as_str(),
            event.medication_id
        );
    }
    Ok(())
}

pub fn watch(config: &AppConfig, for_secs: Option<u64>) -> CliResult<()> {
    let sink = FallbackSink::new(
        TerminalSink::new(config.notifications_enabled),
        LogSink::new(config.notifications_enabled),
    );
    let reminder_clock = ReminderClock::new(
        SqliteRecordStore::open(&config.database_path)?,
        sink,
        SqliteKeyValueStore::open(&config.database_path)?,
        SystemClock,
        config.reminders.clone(),
    );
    let handle = reminder_clock.start()?;
    info!("event=watch_start module=cli status=ok for_secs={for_secs:?}");

    match for_secs {
        Some(secs) => {
            thread::sleep(Duration::from_secs(secs));
            handle.stop();
        }
        None => loop {
            thread::park();
        },
    }
    Ok(())
}
