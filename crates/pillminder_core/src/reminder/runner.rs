//! Background lifecycle for the reminder clock.
//!
//! # Invariants
//! - Exactly one worker thread evaluates; ticks never overlap.
//! - The first tick runs one interval after `start`.
//! - `stop` lets an in-flight tick finish, then joins the worker.

use crate::reminder::engine::ReminderClock;
use crate::reminder::sink::NotificationSink;
use crate::repo::record_store::RecordStore;
use crate::repo::state_store::KeyValueStore;
use crate::time::Clock;
use log::{error, info};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "pillminder-reminders";

/// Handle to a running reminder worker. Dropping it stops the worker.
pub struct ReminderHandle {
    stop_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl ReminderHandle {
    /// Cancels periodic evaluation and waits for the worker to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        // The worker may already be gone; a closed channel is fine.
        let _ = self.stop_tx.send(());
        if worker.join().is_err() {
            error!("event=reminder_stop module=reminder status=error error_code=worker_panicked");
            return;
        }
        info!("event=reminder_stop module=reminder status=ok");
    }
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S, N, K, C> ReminderClock<S, N, K, C>
where
    S: RecordStore + Send + 'static,
    N: NotificationSink + Send + 'static,
    K: KeyValueStore + Send + 'static,
    C: Clock + Send + 'static,
{
    /// Loads the persisted ledger and begins periodic evaluation.
    pub fn start(mut self) -> io::Result<ReminderHandle> {
        self.load_ledger();
        let interval = self.config().tick_interval();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        self.tick();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        info!(
            "event=reminder_start module=reminder status=ok interval_ms={}",
            interval.as_millis()
        );
        Ok(ReminderHandle {
            stop_tx,
            worker: Some(worker),
        })
    }
}
