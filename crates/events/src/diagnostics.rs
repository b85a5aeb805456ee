//! Process-wide diagnostic channel
//!
//! Lock wrappers and other leaf utilities are called from places that carry
//! no event sender. They hand their events to [`report`], which always logs
//! through `tracing` and, between [`install`] and teardown, also forwards the
//! event to the installed sender.

use std::sync::{PoisonError, RwLock};

use crate::{AppEvent, EventLevel, EventMessage, EventSender};

static SINK: RwLock<Option<EventSender>> = RwLock::new(None);

/// Keeps the installed sender in place; dropping it tears the channel down
#[must_use = "dropping the guard uninstalls the diagnostics sender"]
#[derive(Debug)]
pub struct DiagnosticsGuard {
    _private: (),
}

impl Drop for DiagnosticsGuard {
    fn drop(&mut self) {
        uninstall();
    }
}

/// Install `sender` as the process-wide destination, replacing any previous one
pub fn install(sender: EventSender) -> DiagnosticsGuard {
    *SINK.write().unwrap_or_else(PoisonError::into_inner) = Some(sender);
    DiagnosticsGuard { _private: () }
}

/// Remove the installed sender, returning it if there was one
pub fn uninstall() -> Option<EventSender> {
    SINK.write().unwrap_or_else(PoisonError::into_inner).take()
}

#[must_use]
pub fn is_installed() -> bool {
    SINK.read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Log `event` and forward it to the installed sender, if any
pub fn report(event: AppEvent) {
    let message = EventMessage::new(event);
    log_with_tracing(&message);

    let sink = SINK.read().unwrap_or_else(PoisonError::into_inner);
    if let Some(sender) = sink.as_ref() {
        // A closed receiver only means nobody is listening any more
        let _ = sender.send(message);
    }
}

fn log_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    let summary = message.event.summary();
    let target = message.event.log_target();
    match meta.level {
        EventLevel::Error => tracing::error!(
            source = meta.source.as_str(),
            event_id = %meta.event_id,
            event_target = target,
            "{summary}"
        ),
        EventLevel::Warn => tracing::warn!(
            source = meta.source.as_str(),
            event_id = %meta.event_id,
            event_target = target,
            "{summary}"
        ),
        EventLevel::Info => tracing::info!(
            source = meta.source.as_str(),
            event_id = %meta.event_id,
            event_target = target,
            "{summary}"
        ),
        EventLevel::Debug => tracing::debug!(
            source = meta.source.as_str(),
            event_id = %meta.event_id,
            event_target = target,
            "{summary}"
        ),
        EventLevel::Trace => tracing::trace!(
            source = meta.source.as_str(),
            event_id = %meta.event_id,
            event_target = target,
            "{summary}"
        ),
    }
}
