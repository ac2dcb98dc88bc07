use chrono::Local;
use pillminder_core::NotificationSink;
use std::io::{self, IsTerminal, Write};

/// Prints reminders to an interactive terminal.
pub struct TerminalSink {
    enabled: bool,
}

impl TerminalSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl NotificationSink for TerminalSink {
    fn has_permission(&self) -> bool {
        self.enabled
    }

    fn notify(&self, title: &str, body: &str) {
        let mut stdout = io::stdout().lock();
        // A closed terminal is not worth failing a tick over.
        let _ = writeln!(
            stdout,
            "[{}] {title}\n        {body}",
            Local::now().format("%H:%M:%S")
        );
        let _ = stdout.flush();
    }

    fn is_available(&self) -> bool {
        io::stdout().is_terminal()
    }
}
