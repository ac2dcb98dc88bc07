//! Reminder engine tuning.
//!
//! # Invariants
//! - Defaults reproduce the shipped timing policy: 30s polling, a +-1 minute
//!   primary window gated by a 2 minute gap, and a +5 minute retry gated by a
//!   4 minute gap.
//! - `validate()` must pass before a config drives a `ReminderClock`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Timing policy for reminder evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Wall-clock period between evaluation ticks.
    pub tick_interval_ms: u64,
    /// Primary reminder fires while `|now - scheduled|` is within this many minutes.
    pub primary_window_minutes: i32,
    /// Primary reminder needs more than this many seconds since the last one.
    pub primary_min_gap_secs: i64,
    /// Retry fires exactly this many minutes after the scheduled time.
    pub retry_after_minutes: i32,
    /// Retry needs more than this many seconds since the last reminder.
    pub retry_min_gap_secs: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 30_000,
            primary_window_minutes: 1,
            primary_min_gap_secs: 120,
            retry_after_minutes: 5,
            retry_min_gap_secs: 240,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroTickInterval,
    NegativeValue(&'static str),
    RetryInsidePrimaryWindow {
        retry_after_minutes: i32,
        primary_window_minutes: i32,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTickInterval => write!(f, "tick_interval_ms must be greater than zero"),
            Self::NegativeValue(field) => write!(f, "{field} must not be negative"),
            Self::RetryInsidePrimaryWindow {
                retry_after_minutes,
                primary_window_minutes,
            } => write!(
                f,
                "retry_after_minutes ({retry_after_minutes}) must be later than the primary window ({primary_window_minutes})"
            ),
        }
    }
}

impl Error for ConfigError {}

impl ReminderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        let signed = [
            ("primary_window_minutes", i64::from(self.primary_window_minutes)),
            ("primary_min_gap_secs", self.primary_min_gap_secs),
            ("retry_after_minutes", i64::from(self.retry_after_minutes)),
            ("retry_min_gap_secs", self.retry_min_gap_secs),
        ];
        if let Some((field, _)) = signed.iter().find(|(_, value)| *value < 0) {
            return Err(ConfigError::NegativeValue(*field));
        }
        if self.retry_after_minutes <= self.primary_window_minutes {
            return Err(ConfigError::RetryInsidePrimaryWindow {
                retry_after_minutes: self.retry_after_minutes,
                primary_window_minutes: self.primary_window_minutes,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub(crate) fn primary_min_gap_ms(&self) -> i64 {
        self.primary_min_gap_secs.saturating_mul(1000)
    }

    pub(crate) fn retry_min_gap_ms(&self) -> i64 {
        self.retry_min_gap_secs.saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ReminderConfig};

    #[test]
    fn defaults_are_valid() {
        let config = ReminderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval().as_secs(), 30);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ReminderConfig =
            serde_json::from_str(r#"{"retry_after_minutes": 10}"#).unwrap();
        assert_eq!(config.retry_after_minutes, 10);
        assert_eq!(config.primary_min_gap_secs, 120);
    }

    #[test]
    fn rejects_degenerate_settings() {
        let zero = ReminderConfig {
            tick_interval_ms: 0,
            ..ReminderConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroTickInterval));

        let negative = ReminderConfig {
            retry_min_gap_secs: -1,
            ..ReminderConfig::default()
        };
        assert_eq!(
            negative.validate(),
            Err(ConfigError::NegativeValue("retry_min_gap_secs"))
        );

        let overlapping = ReminderConfig {
            retry_after_minutes: 1,
            ..ReminderConfig::default()
        };
        assert!(matches!(
            overlapping.validate(),
            Err(ConfigError::RetryInsidePrimaryWindow { .. })
        ));
    }
}
