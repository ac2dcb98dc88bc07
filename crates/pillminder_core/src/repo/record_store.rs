//! Record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the read/append surface the reminder engine depends on.
//! - Provide medication CRUD and dose history for use-case services.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Medication::validate()` before SQL mutations.
//! - Read paths reject unparseable rows instead of masking them.
//! - Dose events are only ever inserted, never updated.

use crate::db::{open_db, DbError};
use crate::model::dose::{DoseEvent, DoseStatus};
use crate::model::medication::{Frequency, Medication, MedicationId, MedicationValidationError};
use crate::model::time_of_day::TimeOfDay;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const MEDICATION_SELECT_SQL: &str = "SELECT
    id,
    name,
    dosage,
    frequency,
    color
FROM medications";

const DOSE_EVENT_SELECT_SQL: &str = "SELECT
    id,
    medication_id,
    recorded_at,
    dose_date,
    status,
    slot_time
FROM dose_events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for record store persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(MedicationValidationError),
    Db(DbError),
    NotFound(MedicationId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "medication not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<MedicationValidationError> for RepoError {
    fn from(value: MedicationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read/append surface consumed by the reminder engine.
///
/// Implementations are the source of truth; callers re-read on every use.
pub trait RecordStore {
    fn list_medications(&self) -> RepoResult<Vec<Medication>>;
    /// Dose events whose `date` equals `today`.
    fn list_today_dose_events(&self, today: NaiveDate) -> RepoResult<Vec<DoseEvent>>;
    fn append_dose_event(&self, event: &DoseEvent) -> RepoResult<()>;
}

/// Query options for dose history.
#[derive(Debug, Clone, Default)]
pub struct DoseEventQuery {
    pub medication_id: Option<MedicationId>,
    pub limit: Option<u32>,
}

/// Full medication CRUD used by service callers.
pub trait MedicationRepository: RecordStore {
    /// Inserts or replaces a medication and its schedule times.
    fn save_medication(&self, medication: &Medication) -> RepoResult<()>;
    fn get_medication(&self, id: MedicationId) -> RepoResult<Option<Medication>>;
    fn delete_medication(&self, id: MedicationId) -> RepoResult<()>;
    /// Dose history, newest first.
    fn list_dose_events(&self, query: &DoseEventQuery) -> RepoResult<Vec<DoseEvent>>;
}

/// SQLite-backed record store.
///
/// Owns its connection so it can move into the reminder worker thread.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens a database file with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn load_times(
        &self,
        medication_id: Option<MedicationId>,
    ) -> RepoResult<HashMap<MedicationId, Vec<TimeOfDay>>> {
        let mut stmt = self.conn.prepare(
            "SELECT medication_id, time_of_day
             FROM medication_times
             WHERE (?1 IS NULL OR medication_id = ?1)
             ORDER BY medication_id ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query(params![medication_id.map(|id| id.to_string())])?;

        let mut times: HashMap<MedicationId, Vec<TimeOfDay>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let id = parse_uuid(row, "medication_id", "medication_times.medication_id")?;
            let raw: String = row.get("time_of_day")?;
            let time = TimeOfDay::parse(&raw).map_err(|err| {
                RepoError::InvalidData(format!("{err} in medication_times.time_of_day"))
            })?;
            times.entry(id).or_default().push(time);
        }
        Ok(times)
    }

    fn query_dose_events(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<DoseEvent>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_dose_event_row(row)?);
        }
        Ok(events)
    }
}

impl RecordStore for SqliteRecordStore {
    fn list_medications(&self) -> RepoResult<Vec<Medication>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEDICATION_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut medications = Vec::new();
        while let Some(row) = rows.next()? {
            medications.push(parse_medication_row(row)?);
        }

        let mut times = self.load_times(None)?;
        for medication in &mut medications {
            medication.times = times.remove(&medication.id).unwrap_or_default();
        }
        Ok(medications)
    }

    fn list_today_dose_events(&self, today: NaiveDate) -> RepoResult<Vec<DoseEvent>> {
        self.query_dose_events(
            &format!("{DOSE_EVENT_SELECT_SQL} WHERE dose_date = ? ORDER BY recorded_at ASC, id ASC;"),
            vec![Value::Text(today.format(DATE_FORMAT).to_string())],
        )
    }

    fn append_dose_event(&self, event: &DoseEvent) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO dose_events (
                id,
                medication_id,
                recorded_at,
                dose_date,
                status,
                slot_time
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                event.id.to_string(),
                event.medication_id.to_string(),
                event.recorded_at_ms,
                event.date.format(DATE_FORMAT).to_string(),
                event.status.as_str(),
                event.slot_time.map(|time| time.to_string()),
            ],
        )?;
        Ok(())
    }
}

impl MedicationRepository for SqliteRecordStore {
    fn save_medication(&self, medication: &Medication) -> RepoResult<()> {
        medication.validate()?;

        let id = medication.id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO medications (id, name, dosage, frequency, color)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                dosage = excluded.dosage,
                frequency = excluded.frequency,
                color = excluded.color,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                id,
                medication.name.as_str(),
                medication.dosage.as_str(),
                medication.frequency.as_str(),
                medication.color.as_deref(),
            ],
        )?;
        tx.execute(
            "DELETE FROM medication_times WHERE medication_id = ?1;",
            [id.as_str()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO medication_times (medication_id, time_of_day) VALUES (?1, ?2);",
            )?;
            for time in &medication.times {
                insert.execute(params![id, time.to_string()])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_medication(&self, id: MedicationId) -> RepoResult<Option<Medication>> {
        let medication = self
            .conn
            .query_row(
                &format!("{MEDICATION_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_medication_row(row)),
            )
            .optional()?
            .transpose()?;

        let Some(mut medication) = medication else {
            return Ok(None);
        };
        medication.times = self.load_times(Some(id))?.remove(&id).unwrap_or_default();
        Ok(Some(medication))
    }

    fn delete_medication(&self, id: MedicationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_dose_events(&self, query: &DoseEventQuery) -> RepoResult<Vec<DoseEvent>> {
        let mut sql = format!("{DOSE_EVENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(medication_id) = query.medication_id {
            sql.push_str(" AND medication_id = ?");
            bind_values.push(Value::Text(medication_id.to_string()));
        }

        sql.push_str(" ORDER BY recorded_at DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        self.query_dose_events(&sql, bind_values)
    }
}

fn parse_medication_row(row: &Row<'_>) -> RepoResult<Medication> {
    let id = parse_uuid(row, "id", "medications.id")?;

    let frequency_text: String = row.get("frequency")?;
    let frequency = Frequency::parse(&frequency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid frequency `{frequency_text}` in medications.frequency"
        ))
    })?;

    Ok(Medication {
        id,
        name: row.get("name")?,
        dosage: row.get("dosage")?,
        frequency,
        times: Vec::new(),
        color: row.get("color")?,
    })
}

fn parse_dose_event_row(row: &Row<'_>) -> RepoResult<DoseEvent> {
    let id = parse_uuid(row, "id", "dose_events.id")?;
    let medication_id = parse_uuid(row, "medication_id", "dose_events.medication_id")?;

    let date_text: String = row.get("dose_date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in dose_events.dose_date"))
    })?;

    let status_text: String = row.get("status")?;
    let status = DoseStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in dose_events.status"))
    })?;

    let slot_time = match row.get::<_, Option<String>>("slot_time")? {
        Some(raw) => Some(TimeOfDay::parse(&raw).map_err(|err| {
            RepoError::InvalidData(format!("{err} in dose_events.slot_time"))
        })?),
        None => None,
    };

    Ok(DoseEvent {
        id,
        medication_id,
        recorded_at_ms: row.get("recorded_at")?,
        date,
        status,
        slot_time,
    })
}

fn parse_uuid(row: &Row<'_>, column: &str, label: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {label}")))
}
