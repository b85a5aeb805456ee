//! Diagnostics collected while a command runs

use rmkit_events::{AppEvent, EventLevel, EventMessage, EventReceiver};
use serde::Serialize;

/// One diagnostic as shown to the user
#[derive(Debug, Serialize)]
pub struct Diagnostic {
    pub level: EventLevel,
    pub summary: String,
    pub event: AppEvent,
}

/// Drains the diagnostics channel once the command has finished
///
/// The events were already logged through `tracing` when reported; this only
/// keeps them for the JSON result.
pub struct EventHandler {
    debug: bool,
    collected: Vec<Diagnostic>,
}

impl EventHandler {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            collected: Vec::new(),
        }
    }

    /// Take everything currently queued on `receiver`.
    pub fn drain(&mut self, receiver: &mut EventReceiver) {
        while let Ok(message) = receiver.try_recv() {
            self.handle_event(message);
        }
    }

    fn handle_event(&mut self, message: EventMessage) {
        let level = message.meta.level;
        if !self.debug && matches!(level, EventLevel::Debug | EventLevel::Trace) {
            return;
        }
        self.collected.push(Diagnostic {
            level,
            summary: message.event.summary(),
            event: message.event,
        });
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.collected
    }
}
