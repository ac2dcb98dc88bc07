//! Notification ledger.
//!
//! # Responsibility
//! - Remember when each schedule slot was last notified.
//! - Load and persist itself through a `KeyValueStore`.
//!
//! # Invariants
//! - Persisted form is a flat JSON object `{"<medicationId>-<HH:MM>": epoch_ms}`.
//! - Entries are overwritten, never deleted; stale days are harmless because
//!   taken status resets daily.
//! - Loading never fails: unreadable or malformed records become an empty
//!   ledger.

use crate::repo::record_store::RepoResult;
use crate::repo::state_store::KeyValueStore;
use crate::schedule::reconcile::SlotKey;
use log::{info, warn};
use std::collections::BTreeMap;

/// `app_state` key holding the serialized ledger.
pub const NOTIFICATION_LEDGER_KEY: &str = "notification_ledger";

/// Last-notified instants keyed by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationLedger {
    entries: BTreeMap<String, i64>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the persisted ledger, resetting to empty on any failure.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let raw = match store.get_value(NOTIFICATION_LEDGER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=ledger_load module=reminder status=ok entries=0 source=empty");
                return Self::new();
            }
            Err(err) => {
                warn!("event=ledger_load module=reminder status=error action=reset error={err}");
                return Self::new();
            }
        };

        match Self::from_json(&raw) {
            Ok(ledger) => {
                info!(
                    "event=ledger_load module=reminder status=ok entries={}",
                    ledger.len()
                );
                ledger
            }
            Err(err) => {
                warn!(
                    "event=ledger_load module=reminder status=error action=reset error_code=malformed_ledger error={err}"
                );
                Self::new()
            }
        }
    }

    /// Writes the whole ledger back as one record.
    pub fn persist(&self, store: &impl KeyValueStore) -> RepoResult<()> {
        store.put_value(NOTIFICATION_LEDGER_KEY, &self.to_json())
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str::<BTreeMap<String, i64>>(raw)?;
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> String {
        // A string-keyed map of integers always serializes.
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn last_notified(&self, key: &SlotKey) -> Option<i64> {
        self.entries.get(&key.to_string()).copied()
    }

    pub fn record(&mut self, key: &SlotKey, epoch_ms: i64) {
        self.entries.insert(key.to_string(), epoch_ms);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
