//! Wall-clock abstraction for reminder evaluation.
//!
//! # Responsibility
//! - Pair the local wall-clock reading with its absolute instant.
//! - Let tests drive reminder evaluation at fixed times.
//!
//! # Invariants
//! - `LocalInstant::local` is local time; `epoch_ms` is the same moment as
//!   Unix epoch milliseconds.

use crate::model::time_of_day::TimeOfDay;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::sync::{Arc, Mutex};

/// A moment as seen by the local user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalInstant {
    /// Local wall-clock date and time.
    pub local: NaiveDateTime,
    /// Unix epoch milliseconds.
    pub epoch_ms: i64,
}

impl LocalInstant {
    pub fn new(local: NaiveDateTime, epoch_ms: i64) -> Self {
        Self { local, epoch_ms }
    }

    /// Captures a zoned timestamp.
    pub fn from_datetime<Tz: TimeZone>(value: &DateTime<Tz>) -> Self {
        Self {
            local: value.naive_local(),
            epoch_ms: value.timestamp_millis(),
        }
    }

    /// Local calendar day.
    pub fn date(&self) -> NaiveDate {
        self.local.date()
    }

    /// Local time of day truncated to the minute.
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_naive_time(self.local.time())
    }

    pub fn minutes_since_midnight(&self) -> i32 {
        self.time_of_day().minutes_since_midnight()
    }

    /// Returns the instant shifted by `delta` on both clocks.
    pub fn plus(&self, delta: Duration) -> Self {
        Self {
            local: self.local + delta,
            epoch_ms: self.epoch_ms + delta.num_milliseconds(),
        }
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> LocalInstant;
}

/// Reads the host clock in the host time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LocalInstant {
        LocalInstant::from_datetime(&Local::now())
    }
}

/// Settable clock shared between a driver and its observers.
///
/// Cloning yields a handle to the same underlying time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<LocalInstant>>,
}

impl ManualClock {
    pub fn new(start: LocalInstant) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, value: LocalInstant) {
        let mut guard = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = value;
    }

    pub fn advance(&self, delta: Duration) {
        let mut guard = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = guard.plus(delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> LocalInstant {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
