//! Reminder clock: one evaluation tick over the current schedule.
//!
//! # Responsibility
//! - Re-read the record store, reconcile slots and fire due reminders.
//! - Own the notification ledger and its persistence.
//!
//! # Invariants
//! - Without notification permission a tick is a no-op: no store reads, no
//!   ledger mutation, no sink calls.
//! - A failed store read defers to the next tick without touching the ledger.
//! - Taken slots and `AsNeeded` medications never notify.
//! - The ledger is written back only when a tick fired something; a failed
//!   write is logged and tolerated (worst case: one duplicate alert after a
//!   restart).

use crate::config::ReminderConfig;
use crate::reminder::ledger::NotificationLedger;
use crate::reminder::policy::{evaluate_slot, ReminderKind};
use crate::reminder::sink::NotificationSink;
use crate::repo::record_store::RecordStore;
use crate::repo::state_store::KeyValueStore;
use crate::schedule::reconcile::{reconcile_slots, SlotKey};
use crate::time::{Clock, LocalInstant};
use log::{debug, error, info, warn};

/// One reminder delivered during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredReminder {
    pub key: SlotKey,
    pub kind: ReminderKind,
    pub title: String,
    pub body: String,
}

/// Result of one evaluation tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Notification permission is not granted.
    Inactive,
    /// Store data could not be read; retried next tick.
    Deferred,
    /// Evaluation ran; lists what fired (possibly nothing).
    Completed(Vec<FiredReminder>),
}

impl TickOutcome {
    /// Reminders fired by this tick.
    pub fn fired(&self) -> &[FiredReminder] {
        match self {
            Self::Completed(fired) => fired,
            Self::Inactive | Self::Deferred => &[],
        }
    }
}

/// Periodic reminder evaluator.
pub struct ReminderClock<S, N, K, C> {
    store: S,
    sink: N,
    state: K,
    clock: C,
    config: ReminderConfig,
    ledger: NotificationLedger,
}

impl<S, N, K, C> ReminderClock<S, N, K, C>
where
    S: RecordStore,
    N: NotificationSink,
    K: KeyValueStore,
    C: Clock,
{
    /// Builds a clock with an empty in-memory ledger.
    ///
    /// Call `load_ledger` (or `start`) to pick up persisted history.
    pub fn new(store: S, sink: N, state: K, clock: C, config: ReminderConfig) -> Self {
        Self {
            store,
            sink,
            state,
            clock,
            config,
            ledger: NotificationLedger::new(),
        }
    }

    /// Replaces the in-memory ledger with the persisted one.
    pub fn load_ledger(&mut self) {
        self.ledger = NotificationLedger::load(&self.state);
    }

    pub fn ledger(&self) -> &NotificationLedger {
        &self.ledger
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Evaluates at the clock's current time.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Evaluates as if the current time were `now`.
    pub fn tick_at(&mut self, now: LocalInstant) -> TickOutcome {
        if !self.sink.has_permission() {
            debug!("event=reminder_tick module=reminder status=skip reason=no_permission");
            return TickOutcome::Inactive;
        }

        let medications = match self.store.list_medications() {
            Ok(medications) => medications,
            Err(err) => {
                warn!("event=reminder_tick module=reminder status=error stage=list_medications error={err}");
                return TickOutcome::Deferred;
            }
        };
        let today_events = match self.store.list_today_dose_events(now.date()) {
            Ok(events) => events,
            Err(err) => {
                warn!("event=reminder_tick module=reminder status=error stage=list_dose_events error={err}");
                return TickOutcome::Deferred;
            }
        };

        let mut fired = Vec::new();
        for slot in reconcile_slots(&medications, &today_events)
            .into_iter()
            .filter(|slot| !slot.taken)
        {
            let key = slot.key();
            let Some(kind) =
                evaluate_slot(&self.config, now, slot.time, self.ledger.last_notified(&key))
            else {
                continue;
            };

            let (title, body) = kind.compose(slot.medication);
            self.sink.notify(&title, &body);
            self.ledger.record(&key, now.epoch_ms);
            info!(
                "event=reminder_fired module=reminder kind={} slot={key}",
                kind.as_str()
            );
            fired.push(FiredReminder {
                key,
                kind,
                title,
                body,
            });
        }

        if !fired.is_empty() {
            if let Err(err) = self.ledger.persist(&self.state) {
                error!("event=ledger_persist module=reminder status=error error={err}");
            }
        }

        debug!(
            "event=reminder_tick module=reminder status=ok fired={}",
            fired.len()
        );
        TickOutcome::Completed(fired)
    }
}
