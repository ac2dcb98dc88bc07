//! Daily schedule time value.
//!
//! # Responsibility
//! - Parse and render the zero-padded `HH:MM` (24h) wire format.
//! - Provide minutes-since-midnight arithmetic for reminder windows.
//!
//! # Invariants
//! - `Ord` matches ascending time of day, which is also the lexicographic
//!   order of the canonical `HH:MM` string.
//! - Only `00:00..=23:59` is representable.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MINUTES_PER_HOUR: u16 = 60;

/// Time of day at minute precision, e.g. `08:00` or `20:30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

/// Rejection reasons for `HH:MM` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeOfDayError {
    /// Input is not exactly `DD:DD`.
    Malformed(String),
    /// Hour or minute component is out of range.
    OutOfRange(String),
}

impl Display for TimeOfDayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "time `{value}` is not in HH:MM format"),
            Self::OutOfRange(value) => write!(f, "time `{value}` is outside 00:00-23:59"),
        }
    }
}

impl Error for TimeOfDayError {}

impl TimeOfDay {
    /// Builds a time from hour/minute components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeOfDayError> {
        if hour > 23 || minute > 59 {
            return Err(TimeOfDayError::OutOfRange(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self {
            minutes: u16::from(hour) * MINUTES_PER_HOUR + u16::from(minute),
        })
    }

    /// Parses the strict zero-padded `HH:MM` form.
    pub fn parse(value: &str) -> Result<Self, TimeOfDayError> {
        let bytes = value.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|idx| bytes[*idx].is_ascii_digit());
        if !well_formed {
            return Err(TimeOfDayError::Malformed(value.to_string()));
        }

        let parsed = NaiveTime::parse_from_str(value, "%H:%M")
            .map_err(|_| TimeOfDayError::OutOfRange(value.to_string()))?;
        Ok(Self::from_naive_time(parsed))
    }

    /// Truncates a wall-clock time to minute precision.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        // `Timelike` guarantees hour < 24 and minute < 60.
        Self {
            minutes: time.hour() as u16 * MINUTES_PER_HOUR + time.minute() as u16,
        }
    }

    pub fn hour(self) -> u8 {
        (self.minutes / MINUTES_PER_HOUR) as u8
    }

    pub fn minute(self) -> u8 {
        (self.minutes % MINUTES_PER_HOUR) as u8
    }

    /// Minutes elapsed since local midnight (`0..1440`).
    pub fn minutes_since_midnight(self) -> i32 {
        i32::from(self.minutes)
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeOfDay, TimeOfDayError};

    #[test]
    fn parses_zero_padded_values() {
        let time = TimeOfDay::parse("08:05").expect("08:05 should parse");
        assert_eq!(time.hour(), 8);
        assert_eq!(time.minute(), 5);
        assert_eq!(time.minutes_since_midnight(), 485);
        assert_eq!(time.to_string(), "08:05");
    }

    #[test]
    fn rejects_unpadded_and_garbage_input() {
        for raw in ["8:05", "08:5", "0805", "ab:cd", "08:05:00", " 08:05"] {
            let err = TimeOfDay::parse(raw).expect_err("malformed input must fail");
            assert_eq!(err, TimeOfDayError::Malformed(raw.to_string()));
        }
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(matches!(
            TimeOfDay::parse("24:00"),
            Err(TimeOfDayError::OutOfRange(_))
        ));
        assert!(matches!(
            TimeOfDay::parse("12:60"),
            Err(TimeOfDayError::OutOfRange(_))
        ));
        assert!(TimeOfDay::new(23, 60).is_err());
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let mut times: Vec<TimeOfDay> = ["20:00", "08:00", "13:45", "00:10"]
            .iter()
            .map(|raw| raw.parse().unwrap())
            .collect();
        times.sort();
        let rendered: Vec<String> = times.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["00:10", "08:00", "13:45", "20:00"]);
    }

    #[test]
    fn serializes_as_plain_string() {
        let time = TimeOfDay::new(14, 30).unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"14:30\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, time);
        assert!(serde_json::from_str::<TimeOfDay>("\"7:30\"").is_err());
    }
}
