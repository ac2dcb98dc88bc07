//! Notification delivery seam.
//!
//! # Responsibility
//! - Abstract the host's alert capability behind a fire-and-forget call.
//! - Prefer a richer channel when present, falling back otherwise.
//!
//! # Invariants
//! - `notify` never reports failure to the caller; delivery is best-effort.
//! - Channel choice carries no scheduling meaning.

use log::info;

/// Host capability that shows a titled alert to the user.
pub trait NotificationSink {
    /// Whether the user allows alerts; checked once per tick.
    fn has_permission(&self) -> bool;

    /// Shows one alert.
    fn notify(&self, title: &str, body: &str);

    /// Whether this channel can deliver right now.
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn has_permission(&self) -> bool {
        (**self).has_permission()
    }

    fn notify(&self, title: &str, body: &str) {
        (**self).notify(title, body)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Routes alerts to `preferred` when available, else to `fallback`.
pub struct FallbackSink<P, F> {
    preferred: P,
    fallback: F,
}

impl<P: NotificationSink, F: NotificationSink> FallbackSink<P, F> {
    pub fn new(preferred: P, fallback: F) -> Self {
        Self {
            preferred,
            fallback,
        }
    }

    fn uses_preferred(&self) -> bool {
        self.preferred.is_available()
    }
}

impl<P: NotificationSink, F: NotificationSink> NotificationSink for FallbackSink<P, F> {
    fn has_permission(&self) -> bool {
        if self.uses_preferred() {
            self.preferred.has_permission()
        } else {
            self.fallback.has_permission()
        }
    }

    fn notify(&self, title: &str, body: &str) {
        if self.uses_preferred() {
            self.preferred.notify(title, body);
        } else {
            self.fallback.notify(title, body);
        }
    }

    fn is_available(&self) -> bool {
        self.preferred.is_available() || self.fallback.is_available()
    }
}

/// Emits alerts into the application log.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    enabled: bool,
}

impl LogSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NotificationSink for LogSink {
    fn has_permission(&self) -> bool {
        self.enabled
    }

    fn notify(&self, title: &str, body: &str) {
        info!("event=notification module=reminder channel=log title={title:?} body={body:?}");
    }
}
